//! Client for the Google Generative Language API

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tracing::debug;

use crate::llm::{
    error::LlmError,
    model::{ChatModel, DeltaStream},
    types::ChatTurn,
};

use super::sse::parse_sse_stream;
use super::types::to_generate_request;

/// Model identifier substituted when a chat room has none configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Streams completions from hosted Gemini models, authenticating with an
/// API key per request
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the hosted endpoint
    pub fn new() -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different base URL (test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_endpoint_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        )
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn stream_chat(
        &self,
        api_key: &str,
        model: &str,
        transcript: &[ChatTurn],
    ) -> Result<DeltaStream, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::InvalidRequest(
                "API key is not configured".to_string(),
            ));
        }
        if model.is_empty() {
            return Err(LlmError::InvalidRequest("model id is empty".to_string()));
        }

        let request = to_generate_request(transcript);
        let url = self.build_endpoint_url(model);
        debug!(model, turns = transcript.len(), "opening model stream");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let byte_stream = response.bytes_stream();
        let sse_stream = parse_sse_stream(Box::pin(byte_stream));

        // One text fragment per SSE chunk; chunks without text (finish
        // markers) collapse to empty strings the relay skips.
        let deltas = sse_stream.map(|result| result.map(|response| response.text_delta()));

        Ok(Box::pin(deltas))
    }
}
