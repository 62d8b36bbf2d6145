use serde::Serialize;

use crate::services::api_client;
use crate::services::error::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(serde::Deserialize)]
struct ContactResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Send a contact-form message.
pub async fn send_message(request: &ContactRequest) -> Result<String, ApiError> {
    let response: ContactResponse = api_client::post_json("/api/contact", request, false).await?;
    Ok(response
        .message
        .unwrap_or_else(|| "Thanks for reaching out! We will get back to you shortly.".to_string()))
}
