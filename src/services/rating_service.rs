use crate::models::{ApiEnvelope, RatingRequest};
use crate::services::api_client;
use crate::services::error::ApiError;

/// Submit a 1..5 star rating with a comment for a completed appointment.
pub async fn submit_rating(request: &RatingRequest) -> Result<(), ApiError> {
    let envelope: ApiEnvelope<serde_json::Value> =
        api_client::post_json("/api/ratings", request, true).await?;

    if envelope.success {
        log::info!("⭐ Rating submitted for {}", request.appointment_id);
        Ok(())
    } else {
        Err(ApiError::Unexpected(
            envelope
                .message
                .unwrap_or_else(|| "Failed to submit rating".to_string()),
        ))
    }
}
