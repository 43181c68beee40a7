//! Bounded conversation history with synchronous compaction.
//!
//! The history is append-only except for compaction, which atomically
//! replaces everything but the last `keep` messages with one synthetic
//! System summary. Compaction happens inside `add_message`, so a caller
//! never observes a half-compacted history.

use tracing::debug;

use valet_types::config::ConversationSettings;
use valet_types::llm::{LlmError, Tokens};
use valet_types::message::Message;

use crate::llm::tokens::add_tokens;

use super::assistant::Ai;

/// One session's message history, bounded by `max`/`keep`.
pub struct Conversation {
    history: Vec<Message>,
    max: usize,
    keep: usize,
    used_tokens: Tokens,
}

impl Conversation {
    pub fn new(settings: ConversationSettings) -> Self {
        Self {
            history: Vec::new(),
            max: settings.max,
            keep: settings.keep,
            used_tokens: Some(0),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Running token total for this session. `None` once any round's
    /// cost was unknown.
    pub fn used_tokens(&self) -> Tokens {
        self.used_tokens
    }

    /// Add a round's token cost to the running total.
    pub fn charge(&mut self, delta: Tokens) {
        self.used_tokens = add_tokens(self.used_tokens, delta);
    }

    /// Append a message, compacting afterwards when the history has
    /// outgrown `max`.
    ///
    /// After a compaction the history is exactly `keep + 1` messages:
    /// the synthetic summary plus the last `keep` messages verbatim.
    /// A provider failure during summarization propagates; the appended
    /// message is retained either way.
    pub async fn add_message<A: Ai>(&mut self, message: Message, ai: &A) -> Result<(), LlmError> {
        self.history.push(message);

        let len = self.history.len();
        if len <= self.max || len <= self.keep {
            return Ok(());
        }

        let split = len - self.keep;
        let (summary, cost) = ai.summarize(&self.history[..split]).await?;
        self.charge(cost);

        let recent = self.history.split_off(split);
        self.history.clear();
        self.history
            .push(Message::System(format!("Conversation so far: {summary}")));
        self.history.extend(recent);

        debug!(kept = self.keep, "conversation compacted");
        Ok(())
    }
}
