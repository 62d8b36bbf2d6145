use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

/// One transcript entry of the chatbot conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn bot(text: impl Into<String>, options: &[&str]) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Context turn sent to the remote NLU endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotQueryRequest {
    pub query: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub context: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatbotReply {
    pub response: String,
    #[serde(default)]
    pub options: Vec<String>,
}
