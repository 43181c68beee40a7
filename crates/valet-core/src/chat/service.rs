//! Chat service orchestrating one synchronous turn per request.
//!
//! ChatService owns the conversation registry and drives a turn: resolve
//! or create the session, append the user message, run the assistant,
//! charge the token cost, and append the reply back into the history
//! (either append may trigger compaction).

use std::sync::Arc;

use tracing::{debug, info};

use valet_types::chat::{ChatError, ChatReply};
use valet_types::message::Message;

use crate::agent::assistant::Ai;

use super::registry::{ConversationRegistry, SharedConversation};

/// Orchestrates chat turns over live conversations.
///
/// Generic over [`Ai`] so tests can drive it with a stub assistant.
pub struct ChatService<A: Ai> {
    ai: Arc<A>,
    registry: ConversationRegistry,
}

impl<A: Ai> ChatService<A> {
    pub fn new(ai: Arc<A>, registry: ConversationRegistry) -> Self {
        Self { ai, registry }
    }

    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    /// Handle one chat turn.
    ///
    /// `convo_id: None` starts a new session; its generated id comes
    /// back in the reply. An id that resolves to no live session is an
    /// error, never an implicit new session.
    pub async fn handle(
        &self,
        convo_id: Option<String>,
        message: String,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (id, conversation): (String, SharedConversation) = match convo_id {
            Some(id) => {
                let conversation = self
                    .registry
                    .get(&id)
                    .ok_or(ChatError::ConversationNotFound)?;
                (id, conversation)
            }
            None => {
                let (id, conversation) = self.registry.create();
                info!(convo_id = %id, "conversation created");
                (id, conversation)
            }
        };

        let mut conversation = conversation.lock().await;
        conversation
            .add_message(Message::user(message), self.ai.as_ref())
            .await
            .map_err(ChatError::Llm)?;

        let (reply, used) = self.ai.run(conversation.history()).await?;
        conversation.charge(used);

        let text = match &reply {
            Message::Ai(_) => reply.text(),
            _ => return Err(ChatError::NoReply),
        };

        conversation
            .add_message(reply, self.ai.as_ref())
            .await
            .map_err(ChatError::Llm)?;

        debug!(
            convo_id = %id,
            history = conversation.len(),
            used_tokens = ?conversation.used_tokens(),
            "turn complete"
        );

        Ok(ChatReply {
            convo_id: id,
            message: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use valet_types::config::ConversationSettings;
    use valet_types::llm::{LlmError, Tokens};

    struct StubAi {
        reply: Message,
    }

    impl StubAi {
        fn text(reply: &str) -> Self {
            Self {
                reply: Message::ai(reply),
            }
        }
    }

    impl Ai for StubAi {
        async fn run(&self, _history: &[Message]) -> Result<(Message, Tokens), LlmError> {
            Ok((self.reply.clone(), Some(5)))
        }

        async fn summarize(&self, _history: &[Message]) -> Result<(String, Tokens), LlmError> {
            Ok(("gist".to_string(), Some(1)))
        }

        async fn reader(
            &self,
            _instruction: &str,
            _content: &str,
        ) -> Result<(String, Tokens), LlmError> {
            Ok(("digest".to_string(), Some(1)))
        }
    }

    fn service(reply: &str) -> ChatService<StubAi> {
        ChatService::new(
            Arc::new(StubAi::text(reply)),
            ConversationRegistry::new(ConversationSettings::default()),
        )
    }

    #[tokio::test]
    async fn test_new_conversation_roundtrip() {
        let service = service("hello back");
        let reply = service.handle(None, "hello".to_string()).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("hello back"));
        assert!(service.registry().get(&reply.convo_id).is_some());
    }

    #[tokio::test]
    async fn test_existing_conversation_accumulates_history() {
        let service = service("ok");
        let first = service.handle(None, "one".to_string()).await.unwrap();
        service
            .handle(Some(first.convo_id.clone()), "two".to_string())
            .await
            .unwrap();

        let conversation = service.registry().get(&first.convo_id).unwrap();
        // two turns, each a user message plus a reply
        assert_eq!(conversation.lock().await.len(), 4);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let service = service("ok");
        let err = service.handle(None, "   ".to_string()).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn test_unknown_conversation_rejected() {
        let service = service("ok");
        let err = service
            .handle(Some("12345".to_string()), "hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound));
    }

    #[tokio::test]
    async fn test_non_ai_reply_is_no_reply() {
        let service = ChatService::new(
            Arc::new(StubAi {
                reply: Message::System("oops".to_string()),
            }),
            ConversationRegistry::new(ConversationSettings::default()),
        );
        let err = service.handle(None, "hi".to_string()).await.unwrap_err();
        assert!(matches!(err, ChatError::NoReply));
    }

    #[tokio::test]
    async fn test_turn_charges_tokens() {
        let service = service("ok");
        let reply = service.handle(None, "hi".to_string()).await.unwrap();
        let conversation = service.registry().get(&reply.convo_id).unwrap();
        assert_eq!(conversation.lock().await.used_tokens(), Some(5));
    }
}
