//! Request/response bodies for the HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::store::{ChatMessage, ChatRoom, HealthData, LlmProvider, MessageRole};

/// `POST /api/auth/register` body; fields optional so missing ones map to a
/// 400 with a message rather than a deserialization error
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/auth/login` body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: the opaque session token, also set as a cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Uuid,
}

/// `POST /api/chat-rooms/{id}/messages` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub role: MessageRole,
}

/// `GET /api/chat-rooms/{id}/messages` response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageListResponse {
    pub chat_messages: Vec<ChatMessage>,
}

/// `POST /api/chat-rooms` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRoomRequest {
    pub name: Option<String>,
    pub assistant_mode_id: Option<Uuid>,
}

/// Single-room envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomResponse {
    pub chat_room: ChatRoom,
}

/// `GET /api/chat-rooms` response, most recently active first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomListResponse {
    pub chat_rooms: Vec<ChatRoom>,
}

/// `GET /api/llm-providers` response, ordered by stored rank
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmProviderListResponse {
    pub llm_providers: Vec<LlmProvider>,
}

/// `PATCH /api/health-data/{id}` body; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthDataPatchRequest {
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub data: Option<Value>,
}

/// Single health-data envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDataResponse {
    pub health_data: HealthData,
}

/// `{"message": ...}` body used by registration and generic failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": ...}` body used by auth and lookup failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
