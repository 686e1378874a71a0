//! Model streaming layer
//!
//! A [`ChatModel`] turns an assembled transcript into a lazy stream of text
//! deltas from a hosted LLM API. The only production implementation talks to
//! the Google Generative Language API; tests substitute scripted models.

pub mod error;
pub mod gemini;
pub mod model;
pub mod types;

// Re-export commonly used types
pub use error::LlmError;
pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use model::{ChatModel, DeltaStream};
pub use types::{ChatTurn, TurnRole};
