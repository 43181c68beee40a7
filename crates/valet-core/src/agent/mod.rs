//! The agent engine: tool loop, assistant facade, and bounded conversation.

pub mod assistant;
pub mod conversation;
pub mod tool_loop;

pub use assistant::{Ai, Assistant};
pub use conversation::Conversation;
pub use tool_loop::run_tool_loop;
