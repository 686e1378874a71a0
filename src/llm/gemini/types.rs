//! Wire types for the Google Generative Language API
//!
//! Request/response shapes for `models/{model}:streamGenerateContent`.
//! Only the text path is modeled; the API's tool-calling and safety fields
//! are ignored on decode.

use serde::{Deserialize, Serialize};

use crate::llm::types::{ChatTurn, TurnRole};

/// A single text part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// Role-tagged content: `user` or `model` in the contents list, role-less
/// for the system instruction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Streaming generation request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
}

/// One SSE chunk of the streamed response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts in this chunk.
    ///
    /// Empty when the chunk carries no text (e.g. a bare finish reason).
    pub fn text_delta(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Map the assembled transcript to the wire format.
///
/// System turns become the `systemInstruction` (joined when there are
/// several); user turns keep the `user` role and assistant turns become
/// `model`, preserving transcript order.
pub fn to_generate_request(transcript: &[ChatTurn]) -> GenerateContentRequest {
    let system_text = transcript
        .iter()
        .filter(|t| t.role == TurnRole::System)
        .map(|t| t.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let system_instruction = if system_text.is_empty() {
        None
    } else {
        Some(Content::text(None, system_text))
    };

    let contents = transcript
        .iter()
        .filter_map(|turn| match turn.role {
            TurnRole::System => None,
            TurnRole::User => Some(Content::text(Some("user"), turn.content.clone())),
            TurnRole::Assistant => Some(Content::text(Some("model"), turn.content.clone())),
        })
        .collect();

    GenerateContentRequest {
        system_instruction,
        contents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_generate_request_splits_system_from_contents() {
        let transcript = vec![
            ChatTurn::system("be helpful"),
            ChatTurn::user("health context"),
            ChatTurn::user("hi"),
            ChatTurn::assistant("hello"),
        ];

        let request = to_generate_request(&transcript);

        let system = request.system_instruction.expect("system instruction");
        assert_eq!(system.role, None);
        assert_eq!(system.parts[0].text, "be helpful");

        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].parts[0].text, "hi");
        assert_eq!(request.contents[2].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_to_generate_request_without_system_turn() {
        let request = to_generate_request(&[ChatTurn::user("hi")]);
        assert!(request.system_instruction.is_none());
        assert_eq!(request.contents.len(), 1);
    }

    #[test]
    fn test_request_serialization_field_names() {
        let request = to_generate_request(&[ChatTurn::system("sys"), ChatTurn::user("hi")]);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_some());
        assert!(value.get("contents").is_some());
        assert_eq!(value["contents"][0]["role"], "user");
    }

    #[test]
    fn test_response_text_delta() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text_delta(), "Hello");
    }

    #[test]
    fn test_response_text_delta_finish_only_chunk() {
        let json = r#"{"candidates":[{"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text_delta(), "");
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_response_ignores_unknown_fields() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"x"}]},"safetyRatings":[]}],"usageMetadata":{"totalTokenCount":3}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text_delta(), "x");
    }
}
