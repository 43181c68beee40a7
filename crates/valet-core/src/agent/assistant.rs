//! The assistant facade: the three operations the orchestration core
//! needs from a model, and the default implementation over a
//! `BoxChatModel` plus a tool registry.

use std::future::Future;
use std::sync::Arc;

use valet_types::llm::{LlmError, ProviderMessage, ProviderRole, Tokens};
use valet_types::message::Message;

use crate::llm::box_model::BoxChatModel;
use crate::llm::provider::ChatModel;
use crate::llm::tokens::TokenCounter;
use crate::tool::registry::ToolRegistry;

use super::tool_loop::run_tool_loop;

/// Fixed instruction for history compaction.
pub const SUMMARIZE_INSTRUCTION: &str =
    "Summarize the following conversation in 10 concise sentences.";

/// Returned when the model produces no usable summary text.
pub const SUMMARIZE_FALLBACK: &str = "Cannot summarize the conversation";

/// Prefix for content handed to [`Ai::reader`].
const READER_PREFIX: &str = "Help me summarize this content:\n";

/// The model capability the orchestration core depends on.
///
/// Exactly three operations; the core never sees a concrete provider.
/// `summarize` and `reader` run without any tools on offer.
pub trait Ai: Send + Sync {
    /// Run one chat turn over the conversation history, tools included.
    fn run(
        &self,
        history: &[Message],
    ) -> impl Future<Output = Result<(Message, Tokens), LlmError>> + Send;

    /// Compress a slice of history into a short plain-text summary.
    ///
    /// Never fails on empty model output; falls back to a fixed notice.
    fn summarize(
        &self,
        history: &[Message],
    ) -> impl Future<Output = Result<(String, Tokens), LlmError>> + Send;

    /// Digest a piece of external content under a one-off instruction.
    fn reader(
        &self,
        instruction: &str,
        content: &str,
    ) -> impl Future<Output = Result<(String, Tokens), LlmError>> + Send;
}

/// Default [`Ai`] over a boxed chat model.
///
/// Holds the standing system instruction and the tool registry offered
/// during `run`. One instance is shared across all conversations.
pub struct Assistant<C: TokenCounter> {
    model: BoxChatModel,
    registry: Arc<ToolRegistry>,
    counter: C,
    instruction: String,
}

impl<C: TokenCounter> Assistant<C> {
    pub fn new(
        model: BoxChatModel,
        registry: Arc<ToolRegistry>,
        counter: C,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            model,
            registry,
            counter,
            instruction: instruction.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// History -> provider wire form: a filtering map, plus the standing
    /// system instruction up front.
    fn wire_history(&self, history: &[Message]) -> Vec<ProviderMessage> {
        let mut messages = vec![ProviderMessage::new(
            ProviderRole::System,
            self.instruction.clone(),
        )];
        messages.extend(history.iter().filter_map(Message::to_provider));
        messages
    }

    /// One toolless model pass; used by `summarize` and `reader`.
    /// An empty reply falls back to the fixed notice.
    async fn plain_pass(
        &self,
        messages: Vec<ProviderMessage>,
    ) -> Result<(String, Tokens), LlmError> {
        let empty = ToolRegistry::new();
        let (reply, used) = run_tool_loop(&self.model, &self.counter, &empty, messages).await?;
        if reply.content.trim().is_empty() {
            return Ok((SUMMARIZE_FALLBACK.to_string(), used));
        }
        Ok((reply.content, used))
    }
}

impl<C: TokenCounter> Ai for Assistant<C> {
    async fn run(&self, history: &[Message]) -> Result<(Message, Tokens), LlmError> {
        let messages = self.wire_history(history);
        let (reply, used) =
            run_tool_loop(&self.model, &self.counter, &self.registry, messages).await?;
        Ok((Message::from_provider(reply), used))
    }

    async fn summarize(&self, history: &[Message]) -> Result<(String, Tokens), LlmError> {
        // The instruction rides as a trailing user message, after the
        // history being compressed.
        let mut messages: Vec<ProviderMessage> =
            history.iter().filter_map(Message::to_provider).collect();
        messages.push(ProviderMessage::new(
            ProviderRole::User,
            SUMMARIZE_INSTRUCTION.to_string(),
        ));
        self.plain_pass(messages).await
    }

    async fn reader(&self, instruction: &str, content: &str) -> Result<(String, Tokens), LlmError> {
        let messages = vec![
            ProviderMessage::new(ProviderRole::System, instruction.to_string()),
            ProviderMessage::new(ProviderRole::User, format!("{READER_PREFIX}{content}")),
        ];
        self.plain_pass(messages).await
    }
}
