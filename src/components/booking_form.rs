use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::booking::DraftManager;
use crate::config::CONFIG;
use crate::hooks::use_auth;
use crate::models::BookingDraft;
use crate::services::appointment_service;
use crate::utils::time::{time_slots, today_iso};
use crate::utils::validation::{validate_booking_draft, ValidationErrors};

pub const SERVICES: [&str; 12] = [
    "Oil Change",
    "Brake Service",
    "Tire Rotation",
    "Engine Tune-Up",
    "Battery Replacement",
    "Air Conditioning Service",
    "Transmission Service",
    "Wheel Alignment",
    "Suspension Repair",
    "Exhaust System Repair",
    "Diagnostic Service",
    "Full Vehicle Inspection",
];

#[derive(Clone, PartialEq)]
enum Banner {
    Success(String),
    Error(String),
    Info(String),
}

/// The appointment booking form. Submitting while anonymous stashes the
/// draft, opens the auth modal and issues no network call; once the user
/// authenticates the draft resubmits itself exactly once.
#[function_component(BookingForm)]
pub fn booking_form() -> Html {
    let auth = use_auth();
    let form = use_state(BookingDraft::default);
    let errors = use_state(ValidationErrors::new);
    let banner = use_state(|| None::<Banner>);
    let submitting = use_state(|| false);
    let manager = use_state(|| Rc::new(DraftManager::browser()));

    // Prefill personal fields from the authenticated user's record.
    {
        let form = form.clone();
        use_effect_with(auth.user().cloned(), move |user| {
            if let Some(user) = user {
                let mut draft = (*form).clone();
                if draft.customer_name.is_empty() {
                    draft.customer_name = user.name.clone();
                }
                if draft.email.is_empty() {
                    draft.email = user.email.clone();
                }
                if draft.phone_number.is_empty() {
                    draft.phone_number = user.phone.clone().unwrap_or_default();
                }
                form.set(draft);
            }
            || ()
        });
    }

    // Restore-and-resubmit after an auth interruption. begin_resubmit is
    // a no-op when no draft remains or one is already in flight, so a
    // duplicate effect run cannot create two appointments.
    {
        let form = form.clone();
        let errors = errors.clone();
        let banner = banner.clone();
        let manager = manager.clone();
        use_effect_with(auth.is_authenticated(), move |authenticated| {
            if *authenticated {
                let manager = (*manager).clone();
                if let Some(draft) = manager.begin_resubmit() {
                    log::info!("🔄 Restoring stashed booking draft after login");
                    banner.set(Some(Banner::Info("Finishing your booking…".to_string())));

                    // Short grace period so dependent components settle.
                    Timeout::new(CONFIG.booking_config.resubmit_grace_ms, move || {
                        let failures = validate_booking_draft(&draft);
                        if !failures.is_empty() {
                            manager.finish_resubmit(false);
                            form.set(draft);
                            errors.set(failures);
                            banner.set(Some(Banner::Error(
                                "Please review your booking details and submit again.".to_string(),
                            )));
                            return;
                        }

                        spawn_local(async move {
                            match appointment_service::book_appointment(&draft).await {
                                Ok(appointment) => {
                                    manager.finish_resubmit(true);
                                    form.set(BookingDraft::default());
                                    banner.set(Some(Banner::Success(format!(
                                        "Appointment booked for {} at {}!",
                                        appointment.date, appointment.time
                                    ))));
                                }
                                Err(e) => {
                                    // The draft stays persisted; no re-prompt for auth.
                                    manager.finish_resubmit(false);
                                    form.set(draft);
                                    banner.set(Some(Banner::Error(e.to_string())));
                                }
                            }
                        });
                    })
                    .forget();
                }
            }
            || ()
        });
    }

    // Field errors clear as the user types; they are recomputed on the
    // next submit pass.
    macro_rules! text_input {
        ($setter:expr) => {{
            let form = form.clone();
            let errors = errors.clone();
            let setter: fn(&mut BookingDraft, String) = $setter;
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                let mut draft = (*form).clone();
                setter(&mut draft, input.value());
                form.set(draft);
                if !errors.is_empty() {
                    errors.set(ValidationErrors::new());
                }
            })
        }};
    }

    macro_rules! select_input {
        ($setter:expr) => {{
            let form = form.clone();
            let errors = errors.clone();
            let setter: fn(&mut BookingDraft, String) = $setter;
            Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                let mut draft = (*form).clone();
                setter(&mut draft, select.value());
                form.set(draft);
                if !errors.is_empty() {
                    errors.set(ValidationErrors::new());
                }
            })
        }};
    }

    let on_service_change = select_input!(|d, v| d.service = v);
    let on_time_change = select_input!(|d, v| d.time = v);

    let on_message_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            let mut draft = (*form).clone();
            draft.message = area.value();
            form.set(draft);
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let form = form.clone();
        let errors = errors.clone();
        let banner = banner.clone();
        let submitting = submitting.clone();
        let manager = manager.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }

            let draft = (*form).clone();
            let failures = validate_booking_draft(&draft);
            if !failures.is_empty() {
                errors.set(failures);
                return;
            }
            errors.set(ValidationErrors::new());

            if !auth.is_authenticated() {
                // No network call: stash the draft and hand off to auth.
                manager.stash(&draft);
                auth.open_auth_modal();
                banner.set(Some(Banner::Info(
                    "Please log in or sign up to finish your booking — your details are saved."
                        .to_string(),
                )));
                return;
            }

            submitting.set(true);
            let form = form.clone();
            let banner = banner.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                match appointment_service::book_appointment(&draft).await {
                    Ok(appointment) => {
                        form.set(BookingDraft::default());
                        banner.set(Some(Banner::Success(format!(
                            "Appointment booked for {} at {}! We'll be in touch to confirm.",
                            appointment.date, appointment.time
                        ))));
                    }
                    Err(e) => banner.set(Some(Banner::Error(e.to_string()))),
                }
                submitting.set(false);
            });
        })
    };

    let field_error = |field: &str| -> Html {
        match errors.get(field) {
            Some(message) => html! { <span class="error-text">{message}</span> },
            None => html! {},
        }
    };

    html! {
        <section class="booking-section" id="book">
            <div class="container">
                <h2 class="section-title">{"Book an Appointment"}</h2>

                if !auth.is_authenticated() {
                    <div class="login-prompt">
                        {"Please "}
                        <button
                            class="login-link"
                            onclick={{
                                let auth = auth.clone();
                                Callback::from(move |_| auth.open_auth_modal())
                            }}
                        >
                            {"log in or sign up"}
                        </button>
                        {" to book an appointment."}
                    </div>
                }

                {
                    match (*banner).clone() {
                        Some(Banner::Success(m)) => html! { <div class="banner success">{m}</div> },
                        Some(Banner::Error(m)) => html! { <div class="banner error">{m}</div> },
                        Some(Banner::Info(m)) => html! { <div class="banner info">{m}</div> },
                        None => html! {},
                    }
                }

                <form class="booking-form" onsubmit={on_submit}>
                    <div class="form-section">
                        <h3>{"Personal Information"}</h3>
                        <div class="form-grid">
                            <div class="form-group">
                                <label for="customerName">{"Full Name"}</label>
                                <input
                                    type="text"
                                    id="customerName"
                                    placeholder="Enter your full name"
                                    value={form.customer_name.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.customer_name = v)}
                                />
                                { field_error("customerName") }
                            </div>
                            <div class="form-group">
                                <label for="email">{"Email Address"}</label>
                                <input
                                    type="email"
                                    id="email"
                                    placeholder="Enter your email"
                                    value={form.email.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.email = v)}
                                />
                                { field_error("email") }
                            </div>
                            <div class="form-group">
                                <label for="phoneNumber">{"Phone Number"}</label>
                                <input
                                    type="tel"
                                    id="phoneNumber"
                                    placeholder="Enter 10-digit phone number"
                                    value={form.phone_number.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.phone_number = v)}
                                />
                                { field_error("phoneNumber") }
                            </div>
                        </div>
                    </div>

                    <div class="form-section">
                        <h3>{"Vehicle Details"}</h3>
                        <div class="form-grid">
                            <div class="form-group">
                                <label for="vehicleMake">{"Make"}</label>
                                <input
                                    type="text"
                                    id="vehicleMake"
                                    placeholder="e.g. Toyota"
                                    value={form.vehicle_details.make.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.vehicle_details.make = v)}
                                />
                                { field_error("vehicleDetails.make") }
                            </div>
                            <div class="form-group">
                                <label for="vehicleModel">{"Model"}</label>
                                <input
                                    type="text"
                                    id="vehicleModel"
                                    placeholder="e.g. Corolla"
                                    value={form.vehicle_details.model.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.vehicle_details.model = v)}
                                />
                                { field_error("vehicleDetails.model") }
                            </div>
                            <div class="form-group">
                                <label for="vehicleYear">{"Year"}</label>
                                <input
                                    type="text"
                                    id="vehicleYear"
                                    placeholder="e.g. 2019"
                                    value={form.vehicle_details.year.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.vehicle_details.year = v)}
                                />
                                { field_error("vehicleDetails.year") }
                            </div>
                            <div class="form-group">
                                <label for="registrationNumber">{"Registration Number"}</label>
                                <input
                                    type="text"
                                    id="registrationNumber"
                                    placeholder="Enter registration number"
                                    value={form.vehicle_details.registration_number.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.vehicle_details.registration_number = v)}
                                />
                                { field_error("vehicleDetails.registrationNumber") }
                            </div>
                        </div>
                    </div>

                    <div class="form-section">
                        <h3>{"Appointment Details"}</h3>
                        <div class="form-grid">
                            <div class="form-group">
                                <label for="service">{"Service Type"}</label>
                                <select id="service" onchange={on_service_change} value={form.service.clone()}>
                                    <option value="" selected={form.service.is_empty()}>{"Select a service"}</option>
                                    {
                                        SERVICES.iter().map(|s| html! {
                                            <option value={*s} selected={form.service == *s}>{s}</option>
                                        }).collect::<Html>()
                                    }
                                </select>
                                { field_error("service") }
                            </div>
                            <div class="form-group">
                                <label for="date">{"Preferred Date"}</label>
                                <input
                                    type="date"
                                    id="date"
                                    min={today_iso()}
                                    value={form.date.clone()}
                                    oninput={text_input!(|d: &mut BookingDraft, v| d.date = v)}
                                />
                                { field_error("date") }
                            </div>
                            <div class="form-group">
                                <label for="time">{"Preferred Time"}</label>
                                <select id="time" onchange={on_time_change} value={form.time.clone()}>
                                    <option value="" selected={form.time.is_empty()}>{"Select a time"}</option>
                                    {
                                        time_slots().into_iter().map(|t| html! {
                                            <option value={t.clone()} selected={form.time == t}>{t.clone()}</option>
                                        }).collect::<Html>()
                                    }
                                </select>
                                { field_error("time") }
                            </div>
                        </div>
                    </div>

                    <div class="form-section">
                        <div class="form-group full-width">
                            <label for="message">{"Additional Notes (Optional)"}</label>
                            <textarea
                                id="message"
                                rows="4"
                                placeholder="Any specific requirements or concerns?"
                                value={form.message.clone()}
                                oninput={on_message_input}
                            />
                        </div>
                    </div>

                    <button type="submit" class="submit-btn" disabled={*submitting}>
                        { if *submitting { "Booking…" } else { "Book Appointment" } }
                    </button>
                </form>
            </div>
        </section>
    }
}
