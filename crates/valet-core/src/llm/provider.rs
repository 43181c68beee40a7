//! ChatModel trait definition.
//!
//! This is the core abstraction every chat-completion backend implements.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition); the
//! object-safe wrapper lives in [`super::box_model`].

use valet_types::llm::{LlmError, ModelTurn, ProviderMessage};
use valet_types::tool::ToolSpec;

/// Trait for chat-completion backends (OpenAI-compatible endpoints, stubs).
///
/// A single call: send the full message transcript plus the advertised
/// tool catalog, get back one model turn (an assistant message and any
/// tool calls it requested).
///
/// Implementations live in valet-infra (e.g., `OpenAiChatModel`).
pub trait ChatModel: Send + Sync {
    /// Human-readable model name (e.g., "gpt-4.1").
    fn name(&self) -> &str;

    /// Send one completion request and receive the model's turn.
    ///
    /// An empty `tools` slice means the model is not offered any tools;
    /// it must then answer directly.
    fn invoke(
        &self,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
    ) -> impl std::future::Future<Output = Result<ModelTurn, LlmError>> + Send;
}
