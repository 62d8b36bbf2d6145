use gloo_timers::callback::Interval;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;

use crate::config::{CONFIG, TOKEN_KEY, USER_KEY};
use crate::models::Session;
use crate::services::error::ApiError;
use crate::services::{auth_service, SessionStore};

/// The two states of the authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticated,
}

type ChangeListener = Box<dyn Fn(Option<Session>)>;

/// Owns the in-memory auth state. Constructed once at app start, driven
/// by the UI layer through login/register/logout, and by the platform
/// through handle_external_change. Transport for cross-tab notifications
/// is wired up by the caller; the controller itself never touches
/// browser event APIs.
pub struct SessionController {
    store: SessionStore,
    session: RefCell<Option<Session>>,
    listeners: RefCell<Vec<ChangeListener>>,
    refresh_timer: RefCell<Option<Interval>>,
    refreshing: Cell<bool>,
}

impl SessionController {
    pub fn new(store: SessionStore) -> Rc<Self> {
        Rc::new(Self {
            store,
            session: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            refresh_timer: RefCell::new(None),
            refreshing: Cell::new(false),
        })
    }

    pub fn browser() -> Rc<Self> {
        Self::new(SessionStore::browser())
    }

    /// Restores a persisted session, if any, and starts the refresh
    /// timer. Synchronous: storage reads resolve immediately.
    pub fn init(self: &Rc<Self>) -> Option<Session> {
        let session = self.store.init_session();
        match &session {
            Some(s) => log::info!("✅ Session restored for {}", s.user.email),
            None => log::info!("ℹ️ No valid session found"),
        }
        self.replace_session(session.clone());
        session
    }

    pub fn phase(&self) -> AuthPhase {
        if self.session.borrow().is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Registers a listener run on every auth state change.
    pub fn subscribe(&self, listener: impl Fn(Option<Session>) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub async fn login(self: Rc<Self>, email: String, password: String) -> Result<Session, ApiError> {
        let session = auth_service::login(&email, &password).await?;
        self.replace_session(Some(session.clone()));
        Ok(session)
    }

    pub async fn register(
        self: Rc<Self>,
        name: String,
        email: String,
        password: String,
    ) -> Result<Session, ApiError> {
        let session = auth_service::register(&name, &email, &password).await?;
        self.replace_session(Some(session.clone()));
        Ok(session)
    }

    /// Unconditional; never fails.
    pub fn logout(self: &Rc<Self>) {
        log::info!("👋 Logging out");
        self.store.clear_session();
        self.replace_session(None);
    }

    /// Re-runs init_session when another tab touched the session keys.
    /// This is the only way state flows between tabs.
    pub fn handle_external_change(self: &Rc<Self>, key: &str) {
        if key != TOKEN_KEY && key != USER_KEY {
            return;
        }
        log::info!("🔄 Session storage changed in another tab ({})", key);
        let session = self.store.init_session();
        self.replace_session(session);
    }

    /// Applies the outcome of a silent refresh tick: success replaces the
    /// session wholesale, failure forces a logout.
    pub fn apply_refresh_result(self: &Rc<Self>, result: Result<Session, ApiError>) {
        self.refreshing.set(false);
        match result {
            Ok(session) => {
                log::info!("🔄 Session refreshed silently");
                self.replace_session(Some(session));
            }
            Err(error) => {
                log::warn!("⚠️ Session refresh failed, forcing logout: {}", error);
                self.store.clear_session();
                self.replace_session(None);
            }
        }
    }

    /// Cancels the refresh timer. Call when tearing the app down.
    pub fn dispose(&self) {
        self.refresh_timer.borrow_mut().take();
    }

    /// Swaps the in-memory session, reschedules (or cancels) the refresh
    /// timer, and notifies listeners. Every explicit auth state change
    /// funnels through here, which is the reentrancy guard for the timer.
    fn replace_session(self: &Rc<Self>, session: Option<Session>) {
        let authenticated = session.is_some();
        *self.session.borrow_mut() = session;

        self.dispose();
        if authenticated {
            self.start_refresh_timer();
        }
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.current();
        for listener in self.listeners.borrow().iter() {
            listener(snapshot.clone());
        }
    }

    fn start_refresh_timer(self: &Rc<Self>) {
        // Timers exist only in the browser; native builds (tests) skip
        // scheduling and drive apply_refresh_result directly.
        if !cfg!(target_arch = "wasm32") {
            return;
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let interval = Interval::new(CONFIG.auth_config.refresh_interval_ms, move || {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            if controller.refreshing.get() {
                log::info!("🔄 Refresh already in progress, skipping tick");
                return;
            }
            controller.refreshing.set(true);
            spawn_local(async move {
                log::info!("🔄 Attempting silent session refresh");
                let result = auth_service::refresh_session().await;
                controller.apply_refresh_result(result);
            });
        });
        *self.refresh_timer.borrow_mut() = Some(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PENDING_BOOKING_KEY, TOKEN_EXPIRY_KEY};
    use crate::models::User;
    use crate::services::error::AuthError;
    use crate::utils::storage::memory::MemoryStore;
    use crate::utils::storage::KeyValueStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::{TimeZone, Utc};

    fn make_token(exp: i64) -> String {
        let encode = |json: &str| URL_SAFE_NO_PAD.encode(json.as_bytes());
        format!(
            "{}.{}.{}",
            encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            encode(&format!(r#"{{"exp":{}}}"#, exp)),
            encode("signature")
        )
    }

    fn session(exp: i64) -> Session {
        Session {
            token: make_token(exp),
            user: User {
                id: "u1".into(),
                name: "Sam Carter".into(),
                email: "sam@example.com".into(),
                phone: None,
            },
            expires_at: Utc.timestamp_opt(exp, 0).single().unwrap(),
        }
    }

    fn controller_with_stores() -> (Rc<SessionController>, Rc<MemoryStore>, Rc<MemoryStore>) {
        let persistent = Rc::new(MemoryStore::new());
        let scoped = Rc::new(MemoryStore::new());
        let store = SessionStore::new(persistent.clone(), scoped.clone());
        (SessionController::new(store), persistent, scoped)
    }

    #[test]
    fn starts_anonymous_when_nothing_is_persisted() {
        let (controller, _, _) = controller_with_stores();
        assert_eq!(controller.init(), None);
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn init_restores_a_persisted_session() {
        let (controller, persistent, scoped) = controller_with_stores();
        let exp = Utc::now().timestamp() + 3600;
        SessionStore::new(persistent, scoped).persist(&session(exp));

        let restored = controller.init().expect("session should restore");
        assert_eq!(restored.user.email, "sam@example.com");
        assert_eq!(controller.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn logout_is_unconditional_and_clears_storage() {
        let (controller, persistent, scoped) = controller_with_stores();
        let exp = Utc::now().timestamp() + 3600;
        SessionStore::new(persistent.clone(), scoped.clone()).persist(&session(exp));
        scoped.set(PENDING_BOOKING_KEY, "{}");
        controller.init();

        controller.logout();
        controller.logout(); // idempotent

        assert_eq!(controller.phase(), AuthPhase::Anonymous);
        assert!(persistent.get(TOKEN_KEY).is_none());
        assert!(persistent.get(TOKEN_EXPIRY_KEY).is_none());
        assert!(scoped.get(PENDING_BOOKING_KEY).is_none());
    }

    #[test]
    fn refresh_failure_forces_anonymous_and_clears_storage() {
        let (controller, persistent, scoped) = controller_with_stores();
        let exp = Utc::now().timestamp() + 3600;
        SessionStore::new(persistent.clone(), scoped).persist(&session(exp));
        controller.init();
        assert_eq!(controller.phase(), AuthPhase::Authenticated);

        controller.apply_refresh_result(Err(ApiError::Auth(AuthError::Expired)));

        assert_eq!(controller.phase(), AuthPhase::Anonymous);
        assert!(persistent.get(TOKEN_KEY).is_none());
        assert!(persistent.get(USER_KEY).is_none());
    }

    #[test]
    fn refresh_success_replaces_the_session_wholesale() {
        let (controller, persistent, scoped) = controller_with_stores();
        let exp = Utc::now().timestamp() + 3600;
        SessionStore::new(persistent, scoped).persist(&session(exp));
        controller.init();

        let newer = session(exp + 7200);
        controller.apply_refresh_result(Ok(newer.clone()));

        assert_eq!(controller.current(), Some(newer));
    }

    #[test]
    fn external_change_on_session_keys_resyncs_state() {
        let (controller, persistent, scoped) = controller_with_stores();
        controller.init();
        assert_eq!(controller.phase(), AuthPhase::Anonymous);

        // Another tab logs in.
        let exp = Utc::now().timestamp() + 3600;
        SessionStore::new(persistent.clone(), scoped).persist(&session(exp));
        controller.handle_external_change(TOKEN_KEY);
        assert_eq!(controller.phase(), AuthPhase::Authenticated);

        // Another tab logs out.
        persistent.remove(TOKEN_KEY);
        persistent.remove(USER_KEY);
        controller.handle_external_change(USER_KEY);
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn unrelated_storage_keys_are_ignored() {
        let (controller, persistent, scoped) = controller_with_stores();
        let exp = Utc::now().timestamp() + 3600;
        SessionStore::new(persistent, scoped).persist(&session(exp));
        controller.init();

        controller.handle_external_change("theme");
        assert_eq!(controller.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn listeners_observe_every_change() {
        let (controller, _, _) = controller_with_stores();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        controller.subscribe(move |s| sink.borrow_mut().push(s.is_some()));

        controller.init();
        let exp = Utc::now().timestamp() + 3600;
        controller.apply_refresh_result(Ok(session(exp)));
        controller.logout();

        assert_eq!(&*seen.borrow(), &[false, true, false]);
    }
}
