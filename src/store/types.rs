use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Role of a persisted chat message, stored as text in the `role` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Column/text representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "USER",
            MessageRole::Assistant => "ASSISTANT",
        }
    }

    /// Parse the column representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(MessageRole::User),
            "ASSISTANT" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// Registered account row
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub has_onboarded: bool,
    pub created_at: DateTime<Utc>,
}

/// Opaque login session resolved on every protected request
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A conversation thread binding a user, an assistant mode and a model choice
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub assistant_mode_id: Uuid,
    pub llm_provider_id: Option<Uuid>,
    pub llm_provider_model_id: Option<String>,
    pub last_activity_at: DateTime<Utc>,
}

/// Immutable message row, ordered within a room by `created_at`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub role: MessageRole,
}

/// Reusable system prompt owned by a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMode {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub visibility: String,
}

/// A user's configured credentials/endpoint for a model provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmProvider {
    pub id: Uuid,
    pub provider_id: String,
    pub name: String,
    pub api_key: String,
    #[serde(rename = "apiURL")]
    pub api_url: String,
    #[serde(skip)]
    pub rank: i32,
}

/// Typed JSON payload referenced when assembling prompt context
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub data_type: String,
    pub data: Value,
}

/// Everything the append-and-read transaction hands to the chat flow
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub room: ChatRoom,
    pub system_prompt: String,
    pub history: Vec<ChatMessage>,
    pub health_data: Vec<HealthData>,
}
