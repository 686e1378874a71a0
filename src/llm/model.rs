use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::llm::error::LlmError;
use crate::llm::types::ChatTurn;

/// A lazy stream of reply-text fragments from a model
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// A chat-completion backend that streams its reply.
///
/// Implementations resolve the transcript into a delta stream; the call
/// itself fails fast (bad credentials, refused request) while per-fragment
/// failures surface as `Err` items on the stream.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn stream_chat(
        &self,
        api_key: &str,
        model: &str,
        transcript: &[ChatTurn],
    ) -> Result<DeltaStream, LlmError>;
}
