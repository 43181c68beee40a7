//! Conversation registry and the chat turn service.

pub mod registry;
pub mod service;

pub use registry::ConversationRegistry;
pub use service::ChatService;
