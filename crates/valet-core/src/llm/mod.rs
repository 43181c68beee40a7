//! Chat-model abstraction and token accounting.

pub mod box_model;
pub mod provider;
pub mod tokens;

pub use box_model::BoxChatModel;
pub use provider::ChatModel;
pub use tokens::{TokenCounter, add_tokens, estimate_request, estimate_response};
