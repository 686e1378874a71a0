//! Stream relay
//!
//! Pipes model deltas to the HTTP response as newline-delimited JSON frames
//! while accumulating the full reply text. The upstream model call is only
//! awaited once the response body is being polled, so headers go out before
//! the provider answers. After the last delta the finalize callback runs
//! exactly once with the accumulated text; any failure — the upstream call,
//! a mid-stream item, finalize itself — produces a single terminal
//! `{"error": ...}` frame instead, and the partial accumulator is dropped.

use std::convert::Infallible;
use std::future::Future;

use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};
use serde_json::json;
use tracing::error;

use crate::llm::{DeltaStream, LlmError};
use crate::store;

/// Error message sent to the client when the model call fails
const UPSTREAM_ERROR: &str = "Failed to get response from LLM";

/// Error message sent to the client when the reply can't be persisted
const PERSIST_ERROR: &str = "Failed to save assistant message";

/// Frame carrying one text delta for the client to append
pub fn content_frame(delta: &str) -> Bytes {
    Bytes::from(format!("{}\n", json!({ "content": delta })))
}

/// Terminal frame reporting a failed exchange
pub fn error_frame(message: &str) -> Bytes {
    Bytes::from(format!("{}\n", json!({ "error": message })))
}

/// Build the response body stream for one message exchange.
///
/// `upstream` resolves to the model's delta stream (or its terminal error);
/// `finalize` persists the accumulated reply and is invoked exactly once,
/// after the last delta, on the success path only.
pub fn relay<U, F, Fut>(
    upstream: U,
    finalize: F,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send
where
    U: Future<Output = Result<DeltaStream, LlmError>> + Send + 'static,
    F: FnOnce(String) -> Fut + Send + 'static,
    Fut: Future<Output = store::Result<()>> + Send + 'static,
{
    async_stream::stream! {
        let mut deltas = match upstream.await {
            Ok(deltas) => deltas,
            Err(e) => {
                error!(error = %e, "model call failed before streaming");
                yield Ok(error_frame(UPSTREAM_ERROR));
                return;
            }
        };

        let mut full_reply = String::new();
        let mut failed = false;

        while let Some(item) = deltas.next().await {
            match item {
                Ok(delta) => {
                    if delta.is_empty() {
                        continue;
                    }
                    full_reply.push_str(&delta);
                    // forward only the fragment; the client concatenates
                    yield Ok(content_frame(&delta));
                }
                Err(e) => {
                    error!(error = %e, "model stream broke mid-reply");
                    failed = true;
                    break;
                }
            }
        }

        if failed {
            yield Ok(error_frame(UPSTREAM_ERROR));
            return;
        }

        if let Err(e) = finalize(full_reply).await {
            error!(error = %e, "failed to finalize exchange");
            yield Ok(error_frame(PERSIST_ERROR));
        }
    }
}
