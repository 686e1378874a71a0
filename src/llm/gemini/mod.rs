//! Google Generative Language API implementation of [`ChatModel`]
//!
//! [`ChatModel`]: crate::llm::ChatModel

pub mod client;
pub mod sse;
pub mod types;

pub use client::{GeminiClient, DEFAULT_MODEL};
