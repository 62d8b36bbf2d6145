use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::RatingForm;
use crate::hooks::use_auth;
use crate::models::{Appointment, AppointmentStatus};
use crate::services::appointment_service;

/// The authenticated user's appointments: status badges, cancellation for
/// pending ones, rating hand-off for completed ones.
#[function_component(MyAppointments)]
pub fn my_appointments() -> Html {
    let auth = use_auth();
    let appointments = use_state(Vec::<Appointment>::new);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let rating_for = use_state(|| None::<Appointment>);

    let fetch = {
        let appointments = appointments.clone();
        let loading = loading.clone();
        let error = error.clone();
        Callback::from(move |_: ()| {
            let appointments = appointments.clone();
            let loading = loading.clone();
            let error = error.clone();
            spawn_local(async move {
                loading.set(true);
                error.set(None);
                match appointment_service::fetch_user_appointments().await {
                    Ok(list) => appointments.set(list),
                    Err(e) => error.set(Some(e.to_string())),
                }
                loading.set(false);
            });
        })
    };

    {
        let fetch = fetch.clone();
        use_effect_with(auth.is_authenticated(), move |authenticated| {
            if *authenticated {
                fetch.emit(());
            }
            || ()
        });
    }

    let on_cancel = {
        let fetch = fetch.clone();
        let error = error.clone();
        Callback::from(move |id: String| {
            let fetch = fetch.clone();
            let error = error.clone();
            spawn_local(async move {
                match appointment_service::cancel_appointment(&id).await {
                    Ok(()) => fetch.emit(()),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        })
    };

    let close_rating = {
        let rating_for = rating_for.clone();
        let fetch = fetch.clone();
        Callback::from(move |_: ()| {
            rating_for.set(None);
            fetch.emit(());
        })
    };

    if !auth.is_authenticated() {
        return html! {};
    }

    html! {
        <section class="appointments-section" id="my-appointments">
            <div class="container">
                <h2 class="section-title">{"My Appointments"}</h2>

                if let Some(message) = (*error).clone() {
                    <div class="banner error">{message}</div>
                }

                if *loading {
                    <p class="loading-text">{"Loading your appointments…"}</p>
                } else if appointments.is_empty() {
                    <p class="empty-text">{"No appointments yet. Book your first service above!"}</p>
                } else {
                    <div class="appointments-list">
                        {
                            appointments.iter().map(|appointment| {
                                render_appointment(appointment, &on_cancel, &rating_for)
                            }).collect::<Html>()
                        }
                    </div>
                }

                if let Some(appointment) = (*rating_for).clone() {
                    <RatingForm
                        appointment_id={appointment.id.clone()}
                        service={appointment.service.clone()}
                        on_close={close_rating.clone()}
                    />
                }
            </div>
        </section>
    }
}

fn render_appointment(
    appointment: &Appointment,
    on_cancel: &Callback<String>,
    rating_for: &UseStateHandle<Option<Appointment>>,
) -> Html {
    let status_class = match appointment.status {
        AppointmentStatus::Pending => "status-badge pending",
        AppointmentStatus::Confirmed => "status-badge confirmed",
        AppointmentStatus::Completed => "status-badge completed",
        AppointmentStatus::Cancelled => "status-badge cancelled",
    };

    html! {
        <div class="appointment-card" key={appointment.id.clone()}>
            <div class="appointment-info">
                <h4>{ &appointment.service }</h4>
                <p>{ format!("{} at {}", appointment.date, appointment.time) }</p>
                <span class={status_class}>{ appointment.status.label() }</span>
            </div>
            <div class="appointment-actions">
                if appointment.status == AppointmentStatus::Pending {
                    <button
                        class="btn-cancel"
                        onclick={{
                            let on_cancel = on_cancel.clone();
                            let id = appointment.id.clone();
                            Callback::from(move |_| on_cancel.emit(id.clone()))
                        }}
                    >
                        {"Cancel"}
                    </button>
                }
                if appointment.status == AppointmentStatus::Completed {
                    <button
                        class="btn-rate"
                        onclick={{
                            let rating_for = rating_for.clone();
                            let appointment = appointment.clone();
                            Callback::from(move |_| rating_for.set(Some(appointment.clone())))
                        }}
                    >
                        {"Rate Service"}
                    </button>
                }
            </div>
        </div>
    }
}
