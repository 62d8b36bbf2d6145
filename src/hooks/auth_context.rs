// ============================================================================
// AUTH CONTEXT - shares the session lifecycle with the component tree
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::models::{Session, User};
use crate::state::SessionController;

/// Handle the component tree consumes: a render snapshot of the session
/// plus the controller for auth actions and the auth-modal toggle.
#[derive(Clone)]
pub struct AuthHandle {
    controller: Rc<SessionController>,
    session: Option<Session>,
    show_auth_modal: UseStateHandle<bool>,
}

impl PartialEq for AuthHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
            && self.session == other.session
            && *self.show_auth_modal == *other.show_auth_modal
    }
}

impl AuthHandle {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn controller(&self) -> Rc<SessionController> {
        self.controller.clone()
    }

    pub fn logout(&self) {
        self.controller.logout();
    }

    pub fn modal_open(&self) -> bool {
        *self.show_auth_modal
    }

    /// Signals the auth UI to open (e.g. a booking was attempted while
    /// anonymous).
    pub fn open_auth_modal(&self) {
        self.show_auth_modal.set(true);
    }

    pub fn close_auth_modal(&self) {
        self.show_auth_modal.set(false);
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
}

/// Wraps the app, owns the SessionController, and wires the browser
/// storage events to it so logins and logouts propagate across tabs.
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let controller = use_state(SessionController::browser);
    let session = use_state(|| None::<Session>);
    let show_auth_modal = use_state(|| false);

    {
        let controller = controller.clone();
        let session = session.clone();
        use_effect_with((), move |_| {
            let controller = (*controller).clone();
            {
                let session = session.clone();
                controller.subscribe(move |s| session.set(s));
            }
            controller.init();

            // Cross-tab sync. This listener is registered exactly once
            // for the app's lifetime, so forget() does not accumulate.
            if let Some(win) = web_sys::window() {
                let listener_controller = controller.clone();
                let closure = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
                    if let Some(key) = event.key() {
                        listener_controller.handle_external_change(&key);
                    }
                }) as Box<dyn FnMut(web_sys::StorageEvent)>);

                if win
                    .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
                    .is_err()
                {
                    log::warn!("⚠️ Could not register the storage listener");
                }
                closure.forget();
            }

            move || controller.dispose()
        });
    }

    let handle = AuthHandle {
        controller: (*controller).clone(),
        session: (*session).clone(),
        show_auth_modal,
    };

    html! {
        <ContextProvider<AuthHandle> context={handle}>
            { props.children.clone() }
        </ContextProvider<AuthHandle>>
    }
}

#[hook]
pub fn use_auth() -> AuthHandle {
    use_context::<AuthHandle>().expect("use_auth must be used within an AuthProvider")
}
