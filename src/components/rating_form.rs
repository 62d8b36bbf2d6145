use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::models::RatingRequest;
use crate::services::rating_service;
use crate::utils::validation::validate_message;

#[derive(Properties, PartialEq)]
pub struct RatingFormProps {
    pub appointment_id: String,
    pub service: String,
    pub on_close: Callback<()>,
}

/// Star rating (1..5) plus comment for a completed appointment.
#[function_component(RatingForm)]
pub fn rating_form(props: &RatingFormProps) -> Html {
    let rating = use_state(|| 0u8);
    let comment = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let on_comment = {
        let comment = comment.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            comment.set(area.value());
        })
    };

    let on_submit = {
        let props_id = props.appointment_id.clone();
        let on_close = props.on_close.clone();
        let rating = rating.clone();
        let comment = comment.clone();
        let error = error.clone();
        let submitting = submitting.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }

            if *rating == 0 {
                error.set(Some("Please select a rating".to_string()));
                return;
            }
            if let Err(message) = validate_message(&comment) {
                error.set(Some(message));
                return;
            }

            submitting.set(true);
            error.set(None);

            let request = RatingRequest {
                appointment_id: props_id.clone(),
                rating: *rating,
                comment: (*comment).clone(),
            };
            let on_close = on_close.clone();
            let error = error.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                match rating_service::submit_rating(&request).await {
                    Ok(()) => on_close.emit(()),
                    Err(e) => error.set(Some(e.to_string())),
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div class="rating-modal-overlay">
            <div class="rating-modal">
                <h3>{ format!("How was your {}?", props.service) }</h3>

                if let Some(message) = (*error).clone() {
                    <div class="banner error">{message}</div>
                }

                <form onsubmit={on_submit}>
                    <div class="star-row">
                        {
                            (1..=5u8).map(|star| {
                                let rating_handle = rating.clone();
                                let filled = *rating >= star;
                                html! {
                                    <button
                                        type="button"
                                        class={if filled { "star filled" } else { "star" }}
                                        onclick={Callback::from(move |_| rating_handle.set(star))}
                                    >
                                        { if filled { "★" } else { "☆" } }
                                    </button>
                                }
                            }).collect::<Html>()
                        }
                    </div>

                    <div class="form-group">
                        <label for="rating-comment">{"Tell us more"}</label>
                        <textarea
                            id="rating-comment"
                            rows="4"
                            placeholder="What went well? What could we improve?"
                            value={(*comment).clone()}
                            oninput={on_comment}
                        />
                    </div>

                    <div class="rating-actions">
                        <button type="submit" class="btn-primary" disabled={*submitting}>
                            { if *submitting { "Submitting…" } else { "Submit Rating" } }
                        </button>
                        <button
                            type="button"
                            class="btn-secondary"
                            onclick={{
                                let on_close = props.on_close.clone();
                                Callback::from(move |_| on_close.emit(()))
                            }}
                        >
                            {"Close"}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
