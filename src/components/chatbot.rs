use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::booking::{DialogueEngine, EngineAction};
use crate::hooks::use_auth;
use crate::models::Speaker;
use crate::services::{appointment_service, chatbot_service};

/// Floating chatbot widget. All conversation logic lives in the
/// DialogueEngine; this component renders the transcript, feeds input in,
/// and runs the network side effects the engine asks for. Input stays
/// disabled while a triggered request is in flight, so transitions are
/// strictly sequential.
#[function_component(Chatbot)]
pub fn chatbot() -> Html {
    let auth = use_auth();
    let engine = use_mut_ref(|| DialogueEngine::new(None));
    let open = use_state(|| false);
    let input_value = use_state(String::new);
    let busy = use_state(|| false);
    // Bumped after every engine mutation to trigger a re-render.
    let version = use_state(|| 0u32);

    // Keep the engine's notion of the current user in sync, so the
    // authenticated fast path applies.
    {
        let engine = engine.clone();
        use_effect_with(auth.user().cloned(), move |user| {
            engine.borrow_mut().set_user(user.clone());
            || ()
        });
    }

    let process = {
        let engine = engine.clone();
        let busy = busy.clone();
        let version = version.clone();
        let user_id = auth.user().map(|u| u.id.clone());

        Callback::from(move |input: String| {
            if *busy {
                return;
            }

            let action = engine.borrow_mut().handle_input(&input);
            version.set(version.wrapping_add(1));

            match action {
                EngineAction::None => {}
                EngineAction::SubmitBooking(request) => {
                    busy.set(true);
                    let engine = engine.clone();
                    let busy = busy.clone();
                    let version = version.clone();
                    spawn_local(async move {
                        let result = appointment_service::book_via_chatbot(&request).await;
                        engine.borrow_mut().resolve_submit(result);
                        busy.set(false);
                        version.set(version.wrapping_add(1));
                    });
                }
                EngineAction::Query(query) => {
                    busy.set(true);
                    let context = engine.borrow().context();
                    let engine = engine.clone();
                    let busy = busy.clone();
                    let version = version.clone();
                    let user_id = user_id.clone();
                    spawn_local(async move {
                        let result = chatbot_service::send_query(&query, context, user_id).await;
                        engine.borrow_mut().resolve_query(result);
                        busy.set(false);
                        version.set(version.wrapping_add(1));
                    });
                }
            }
        })
    };

    let on_toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };

    let on_send = {
        let input_value = input_value.clone();
        let process = process.clone();
        Callback::from(move |_: MouseEvent| {
            let text = (*input_value).clone();
            if !text.trim().is_empty() {
                input_value.set(String::new());
                process.emit(text);
            }
        })
    };

    let on_keypress = {
        let input_value = input_value.clone();
        let process = process.clone();
        let busy = busy.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !*busy {
                let text = (*input_value).clone();
                if !text.trim().is_empty() {
                    input_value.set(String::new());
                    process.emit(text);
                }
            }
        })
    };

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input_value.set(input.value());
        })
    };

    if !*open {
        return html! {
            <div class="chatbot-container">
                <button class="chat-toggle-btn" onclick={on_toggle}>{"💬"}</button>
            </div>
        };
    }

    let waiting = *busy || engine.borrow().is_waiting();

    html! {
        <div class="chatbot-container">
            <div class="chat-window">
                <div class="chat-header">
                    <span>{"Revvy – Car Service Assistant"}</span>
                    <button class="close-icon" onclick={on_toggle.clone()}>{"×"}</button>
                </div>

                <div class="chat-messages">
                    { render_messages(&engine, &process, waiting) }
                    if waiting {
                        <div class="message bot loading">{"Thinking…"}</div>
                    }
                </div>

                <div class="chat-input">
                    <input
                        type="text"
                        placeholder="Type your message…"
                        value={(*input_value).clone()}
                        oninput={on_input}
                        onkeypress={on_keypress}
                        disabled={waiting}
                    />
                    <button onclick={on_send} disabled={waiting || input_value.trim().is_empty()}>
                        {"Send"}
                    </button>
                </div>
            </div>
        </div>
    }
}

fn render_messages(
    engine: &Rc<RefCell<DialogueEngine>>,
    process: &Callback<String>,
    waiting: bool,
) -> Html {
    engine
        .borrow()
        .transcript()
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let class = match message.speaker {
                Speaker::User => "message user",
                Speaker::Bot => "message bot",
            };
            html! {
                <div class={class} key={i}>
                    <div class="message-content">{ &message.text }</div>
                    if !message.options.is_empty() {
                        <div class="message-options">
                            {
                                message.options.iter().map(|option| {
                                    let process = process.clone();
                                    let value = option.clone();
                                    html! {
                                        <button
                                            class="option-button"
                                            disabled={waiting}
                                            onclick={Callback::from(move |_| process.emit(value.clone()))}
                                        >
                                            { option }
                                        </button>
                                    }
                                }).collect::<Html>()
                            }
                        </div>
                    }
                </div>
            }
        })
        .collect::<Html>()
}
