//! healthchat — a chat backend with streaming assistant replies.
//!
//! Users register, get seeded with assistant modes and provider slots, open
//! chat rooms, and exchange messages with a hosted LLM. Assistant replies are
//! streamed back token-by-token as newline-delimited JSON frames and persisted
//! once the stream completes.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod relay;
pub mod routes;
pub mod store;
