use uuid::Uuid;

use crate::config::CHAT_SESSION_KEY;
use crate::models::{ApiEnvelope, ChatTurn, ChatbotQueryRequest, ChatbotReply};
use crate::services::api_client;
use crate::services::error::ApiError;
use crate::utils::storage::{BrowserStore, KeyValueStore};

/// Stable id for this browser session's conversation, minted on first use.
pub fn chat_session_id() -> String {
    let store = BrowserStore::session();
    if let Some(existing) = store.get(CHAT_SESSION_KEY) {
        return existing;
    }
    let id = Uuid::new_v4().to_string();
    store.set(CHAT_SESSION_KEY, &id);
    id
}

/// Free-form question to the remote NLU endpoint, with accumulated
/// conversation context. The endpoint is an opaque collaborator.
pub async fn send_query(
    query: &str,
    context: Vec<ChatTurn>,
    user_id: Option<String>,
) -> Result<ChatbotReply, ApiError> {
    let request = ChatbotQueryRequest {
        query: query.to_string(),
        session_id: chat_session_id(),
        user_id,
        context,
    };

    let envelope: ApiEnvelope<ChatbotReply> =
        api_client::post_json("/api/chatbot/query", &request, false).await?;

    envelope.data.ok_or_else(|| {
        ApiError::Unexpected(
            envelope
                .message
                .unwrap_or_else(|| "Empty chatbot reply".to_string()),
        )
    })
}
