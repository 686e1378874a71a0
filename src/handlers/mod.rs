//! Route handlers

pub mod auth_routes;
pub mod chat_messages;
pub mod chat_rooms;
pub mod health_data;
pub mod llm_providers;
pub mod pages;
pub mod reject;

pub use auth_routes::{login_handler, register_handler};
pub use chat_messages::{list_messages_handler, send_message_handler};
pub use chat_rooms::{create_chat_room_handler, list_chat_rooms_handler};
pub use health_data::{delete_health_data_handler, get_health_data_handler, patch_health_data_handler};
pub use llm_providers::list_llm_providers_handler;
pub use pages::{login_page_handler, page_gate_handler};
pub use reject::handle_rejection;
