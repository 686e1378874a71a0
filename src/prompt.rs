//! Prompt assembly
//!
//! Builds the ordered transcript sent to the model: system prompt first,
//! then a synthetic user entry carrying the caller's health-data records,
//! then the conversation history in creation order. The model treats the
//! three segments as instruction, context and conversation respectively, so
//! the order is fixed.

use crate::llm::ChatTurn;
use crate::store::{ChatMessage, HealthData, MessageRole};

/// Assemble the role-tagged transcript for one model call.
///
/// `history` must already be ordered ascending by creation time and is
/// expected to include the just-committed user message.
pub fn build_transcript(
    system_prompt: &str,
    health_data: &[HealthData],
    history: &[ChatMessage],
) -> Vec<ChatTurn> {
    let mut transcript = Vec::with_capacity(history.len() + 2);

    transcript.push(ChatTurn::system(system_prompt));
    transcript.push(ChatTurn::user(render_health_context(health_data)));

    for message in history {
        let turn = match message.role {
            MessageRole::User => ChatTurn::user(message.content.clone()),
            MessageRole::Assistant => ChatTurn::assistant(message.content.clone()),
        };
        transcript.push(turn);
    }

    transcript
}

/// Render every record as `<type>: <json payload>`, newline-joined
fn render_health_context(health_data: &[HealthData]) -> String {
    let rendered = health_data
        .iter()
        .map(|record| format!("{}: {}", record.data_type, record.data))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Health data sources: {}", rendered)
}
