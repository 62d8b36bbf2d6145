use crate::models::appointment::AppointmentData;
use crate::models::{ApiEnvelope, Appointment, BookingDraft, ChatBookingRequest};
use crate::services::api_client;
use crate::services::error::ApiError;

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, ApiError> {
    envelope.data.ok_or_else(|| {
        ApiError::Unexpected(
            envelope
                .message
                .unwrap_or_else(|| "Empty response from server".to_string()),
        )
    })
}

/// Book a new appointment for the authenticated user.
pub async fn book_appointment(draft: &BookingDraft) -> Result<Appointment, ApiError> {
    let envelope: ApiEnvelope<AppointmentData> =
        api_client::post_json("/api/appointments", draft, true).await?;
    let appointment = unwrap_envelope(envelope)?.appointment;
    log::info!("✅ Appointment booked: {}", appointment.id);
    Ok(appointment)
}

/// Guest booking issued by the chatbot; no bearer required.
pub async fn book_via_chatbot(request: &ChatBookingRequest) -> Result<Appointment, ApiError> {
    let envelope: ApiEnvelope<AppointmentData> =
        api_client::post_json("/api/appointments/chatbot", request, false).await?;
    let appointment = unwrap_envelope(envelope)?.appointment;
    log::info!("✅ Chatbot appointment booked: {}", appointment.id);
    Ok(appointment)
}

pub async fn fetch_user_appointments() -> Result<Vec<Appointment>, ApiError> {
    let envelope: ApiEnvelope<Vec<Appointment>> =
        api_client::get_json("/api/appointments/user", true).await?;
    unwrap_envelope(envelope)
}

pub async fn cancel_appointment(id: &str) -> Result<(), ApiError> {
    let _: ApiEnvelope<AppointmentData> = api_client::put_json(
        &format!("/api/appointments/{}/cancel", id),
        &serde_json::json!({}),
        true,
    )
    .await?;
    log::info!("🗑️ Appointment cancelled: {}", id);
    Ok(())
}

pub async fn update_appointment_status(id: &str, status: &str) -> Result<(), ApiError> {
    let _: ApiEnvelope<AppointmentData> = api_client::put_json(
        &format!("/api/appointments/{}/status", id),
        &serde_json::json!({ "status": status }),
        true,
    )
    .await?;
    Ok(())
}
