//! Chat-model client and token counters.

pub mod counter;
pub mod openai;

pub use counter::{DisabledTokenCounter, HeuristicTokenCounter};
pub use openai::OpenAiChatModel;
