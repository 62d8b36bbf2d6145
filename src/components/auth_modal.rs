use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_auth;
use crate::services::auth_service;
use crate::utils::validation::{validate_email, validate_name, validate_password};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
}

/// Login / register / password-reset modal. Opened by the navbar or by a
/// booking attempt while anonymous; closes itself on success.
#[function_component(AuthModal)]
pub fn auth_modal() -> Html {
    let auth = use_auth();
    let mode = use_state(|| Mode::Login);
    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let reset_token = use_state(String::new);
    let error = use_state(|| None::<String>);
    let info = use_state(|| None::<String>);
    let loading = use_state(|| false);

    if !auth.modal_open() {
        return html! {};
    }

    let on_close = {
        let auth = auth.clone();
        Callback::from(move |_: MouseEvent| auth.close_auth_modal())
    };

    let oninput = |handle: UseStateHandle<String>| {
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };

    let switch_mode = |target: Mode, mode: UseStateHandle<Mode>, error: UseStateHandle<Option<String>>| {
        Callback::from(move |_: MouseEvent| {
            mode.set(target);
            error.set(None);
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let mode = mode.clone();
        let name = name.clone();
        let email = email.clone();
        let password = password.clone();
        let reset_token = reset_token.clone();
        let error = error.clone();
        let info = info.clone();
        let loading = loading.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }

            // Local validation blocks the network call entirely.
            let mut failures = Vec::new();
            if *mode == Mode::Register {
                if let Err(msg) = validate_name(&name) {
                    failures.push(msg);
                }
            }
            if *mode != Mode::ResetPassword {
                if let Err(msg) = validate_email(&email) {
                    failures.push(msg);
                }
            }
            if *mode == Mode::ResetPassword && reset_token.trim().is_empty() {
                failures.push("Reset code is required".to_string());
            }
            if *mode != Mode::ForgotPassword {
                if let Err(msg) = validate_password(&password) {
                    failures.push(msg);
                }
            }
            if !failures.is_empty() {
                error.set(Some(failures.join("\n")));
                return;
            }

            error.set(None);
            loading.set(true);

            let auth = auth.clone();
            let mode_value = *mode;
            let mode = mode.clone();
            let name_value = (*name).clone();
            let email_value = (*email).clone();
            let password_value = (*password).clone();
            let token_value = (*reset_token).clone();
            let error = error.clone();
            let info = info.clone();
            let loading = loading.clone();

            spawn_local(async move {
                match mode_value {
                    Mode::Login => {
                        match auth.controller().login(email_value, password_value).await {
                            Ok(_) => auth.close_auth_modal(),
                            Err(e) => error.set(Some(e.to_string())),
                        }
                    }
                    Mode::Register => {
                        match auth
                            .controller()
                            .register(name_value, email_value, password_value)
                            .await
                        {
                            Ok(_) => auth.close_auth_modal(),
                            Err(e) => error.set(Some(e.to_string())),
                        }
                    }
                    Mode::ForgotPassword => {
                        match auth_service::request_password_reset(&email_value).await {
                            Ok(message) => {
                                info.set(Some(message));
                                mode.set(Mode::ResetPassword);
                            }
                            Err(e) => error.set(Some(e.to_string())),
                        }
                    }
                    Mode::ResetPassword => {
                        match auth_service::reset_password(&token_value, &password_value).await {
                            Ok(message) => {
                                info.set(Some(message));
                                mode.set(Mode::Login);
                            }
                            Err(e) => error.set(Some(e.to_string())),
                        }
                    }
                }
                loading.set(false);
            });
        })
    };

    let (title, submit_label) = match *mode {
        Mode::Login => ("Welcome back", "Log In"),
        Mode::Register => ("Create your account", "Sign Up"),
        Mode::ForgotPassword => ("Reset your password", "Send Reset Link"),
        Mode::ResetPassword => ("Choose a new password", "Reset Password"),
    };

    html! {
        <div class="auth-modal-overlay" onclick={on_close.clone()}>
            <div class="auth-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <button class="close-button" onclick={on_close}>{"×"}</button>
                <h2>{title}</h2>

                if let Some(message) = (*error).clone() {
                    <div class="auth-error">{message}</div>
                }
                if let Some(message) = (*info).clone() {
                    <div class="auth-info">{message}</div>
                }

                <form onsubmit={on_submit}>
                    if *mode == Mode::Register {
                        <div class="form-group">
                            <label for="auth-name">{"Full Name"}</label>
                            <input
                                type="text"
                                id="auth-name"
                                placeholder="Enter your full name"
                                value={(*name).clone()}
                                oninput={oninput(name.clone())}
                            />
                        </div>
                    }

                    if *mode != Mode::ResetPassword {
                        <div class="form-group">
                            <label for="auth-email">{"Email"}</label>
                            <input
                                type="email"
                                id="auth-email"
                                placeholder="Enter your email"
                                value={(*email).clone()}
                                oninput={oninput(email.clone())}
                            />
                        </div>
                    }

                    if *mode == Mode::ResetPassword {
                        <div class="form-group">
                            <label for="auth-reset-token">{"Reset Code"}</label>
                            <input
                                type="text"
                                id="auth-reset-token"
                                placeholder="Paste the code from your email"
                                value={(*reset_token).clone()}
                                oninput={oninput(reset_token.clone())}
                            />
                        </div>
                    }

                    if *mode != Mode::ForgotPassword {
                        <div class="form-group">
                            <label for="auth-password">
                                { if *mode == Mode::ResetPassword { "New Password" } else { "Password" } }
                            </label>
                            <input
                                type="password"
                                id="auth-password"
                                placeholder="Enter your password"
                                value={(*password).clone()}
                                oninput={oninput(password.clone())}
                            />
                        </div>
                    }

                    <button type="submit" class="btn-primary" disabled={*loading}>
                        { if *loading { "Please wait…" } else { submit_label } }
                    </button>
                </form>

                <div class="auth-modal-footer">
                    {
                        match *mode {
                            Mode::Login => html! {
                                <>
                                    <button class="link-button" onclick={switch_mode(Mode::ForgotPassword, mode.clone(), error.clone())}>
                                        {"Forgot password?"}
                                    </button>
                                    <button class="link-button" onclick={switch_mode(Mode::Register, mode.clone(), error.clone())}>
                                        {"New here? Create an account"}
                                    </button>
                                </>
                            },
                            Mode::ForgotPassword => html! {
                                <>
                                    <button class="link-button" onclick={switch_mode(Mode::ResetPassword, mode.clone(), error.clone())}>
                                        {"Already have a reset code?"}
                                    </button>
                                    <button class="link-button" onclick={switch_mode(Mode::Login, mode.clone(), error.clone())}>
                                        {"Back to login"}
                                    </button>
                                </>
                            },
                            Mode::Register | Mode::ResetPassword => html! {
                                <button class="link-button" onclick={switch_mode(Mode::Login, mode.clone(), error.clone())}>
                                    {"Back to login"}
                                </button>
                            },
                        }
                    }
                </div>
            </div>
        </div>
    }
}
