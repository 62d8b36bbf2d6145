use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::services::contact_service::{self, ContactRequest};
use crate::utils::validation::{validate_email, validate_message, validate_name, ValidationErrors};

/// Contact form sharing the booking form's validators.
#[function_component(ContactSection)]
pub fn contact_section() -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let message = use_state(String::new);
    let errors = use_state(ValidationErrors::new);
    let banner = use_state(|| None::<Result<String, String>>);
    let sending = use_state(|| false);

    let on_submit = {
        let name = name.clone();
        let email = email.clone();
        let message = message.clone();
        let errors = errors.clone();
        let banner = banner.clone();
        let sending = sending.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *sending {
                return;
            }

            let mut failures = ValidationErrors::new();
            failures.check("name", validate_name(&name));
            failures.check("email", validate_email(&email));
            failures.check("message", validate_message(&message));
            if !failures.is_empty() {
                errors.set(failures);
                return;
            }
            errors.set(ValidationErrors::new());
            sending.set(true);

            let request = ContactRequest {
                name: (*name).clone(),
                email: (*email).clone(),
                message: (*message).clone(),
            };
            let name = name.clone();
            let message_handle = message.clone();
            let banner = banner.clone();
            let sending = sending.clone();
            spawn_local(async move {
                match contact_service::send_message(&request).await {
                    Ok(reply) => {
                        banner.set(Some(Ok(reply)));
                        name.set(String::new());
                        message_handle.set(String::new());
                    }
                    Err(e) => banner.set(Some(Err(e.to_string()))),
                }
                sending.set(false);
            });
        })
    };

    let text_input = |handle: UseStateHandle<String>| {
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };

    let on_message_input = {
        let message = message.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            message.set(area.value());
        })
    };

    let field_error = |field: &str| -> Html {
        match errors.get(field) {
            Some(msg) => html! { <span class="error-text">{msg}</span> },
            None => html! {},
        }
    };

    html! {
        <section class="contact-section" id="contact">
            <div class="container">
                <h2 class="section-title">{"Get in Touch"}</h2>

                {
                    match (*banner).clone() {
                        Some(Ok(m)) => html! { <div class="banner success">{m}</div> },
                        Some(Err(m)) => html! { <div class="banner error">{m}</div> },
                        None => html! {},
                    }
                }

                <form class="contact-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="contact-name">{"Name"}</label>
                        <input
                            type="text"
                            id="contact-name"
                            placeholder="Your name"
                            value={(*name).clone()}
                            oninput={text_input(name.clone())}
                        />
                        { field_error("name") }
                    </div>
                    <div class="form-group">
                        <label for="contact-email">{"Email"}</label>
                        <input
                            type="email"
                            id="contact-email"
                            placeholder="Your email"
                            value={(*email).clone()}
                            oninput={text_input(email.clone())}
                        />
                        { field_error("email") }
                    </div>
                    <div class="form-group">
                        <label for="contact-message">{"Message"}</label>
                        <textarea
                            id="contact-message"
                            rows="5"
                            placeholder="How can we help?"
                            value={(*message).clone()}
                            oninput={on_message_input}
                        />
                        { field_error("message") }
                    </div>
                    <button type="submit" class="btn-primary" disabled={*sending}>
                        { if *sending { "Sending…" } else { "Send Message" } }
                    </button>
                </form>
            </div>
        </section>
    }
}
