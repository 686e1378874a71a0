//! Persistence gateway
//!
//! Explicit SQL over a deadpool-managed Postgres pool. Multi-row
//! consistency (registration seeding, the chat append-and-read, the chat
//! finalize) is handled with per-operation transactions; everything else is
//! single-statement.

pub mod client;
pub mod connection;
pub mod error;
pub mod seed;
pub mod types;

// Re-export main types for convenience
pub use client::{HealthDataPatch, Store};
pub use connection::StoreConfig;
pub use error::{Error, Result};
pub use types::{
    AssistantMode, ChatContext, ChatMessage, ChatRoom, HealthData, LlmProvider, MessageRole,
    Session, User,
};
