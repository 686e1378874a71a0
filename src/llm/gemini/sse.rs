//! SSE parser for the streaming generate endpoint
//!
//! The API emits `data: <json>` lines over a chunked response. Chunk
//! boundaries don't respect line boundaries (or even UTF-8 codepoint
//! boundaries), so raw bytes are buffered and only complete lines are
//! decoded; a trailing partial line carries over to the next chunk.

use bytes::{Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::error::LlmError;

use super::types::GenerateContentResponse;

/// Parse a byte stream as SSE events, yielding one decoded response per
/// `data:` line. Non-data lines (`event:`, `id:`, blanks) are skipped.
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, LlmError>> + Send>> {
    let mut buffer = BytesMut::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend_from_slice(&chunk);

        let mut events = Vec::new();
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line_bytes = buffer.split_to(newline_pos + 1);

            let line = match std::str::from_utf8(&line_bytes[..newline_pos]) {
                Ok(t) => t.trim(),
                Err(e) => {
                    events.push(Err(LlmError::StreamError(format!(
                        "Invalid UTF-8 in stream: {}",
                        e
                    ))));
                    continue;
                }
            };

            if line.is_empty() {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                match serde_json::from_str::<GenerateContentResponse>(data) {
                    Ok(response) => events.push(Ok(response)),
                    Err(e) => {
                        events.push(Err(LlmError::SerializationError(format!(
                            "Failed to parse SSE data: {}. Data: {}",
                            e, data
                        ))));
                    }
                }
            }
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}
