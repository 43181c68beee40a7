//! Process-wide map of live conversations, keyed by conversation id.
//!
//! Entries are created lazily on the first message of a session and are
//! never evicted; a conversation lives for the process lifetime.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use valet_types::config::ConversationSettings;

use crate::agent::conversation::Conversation;

/// Shared handle to one conversation.
///
/// The async mutex serializes turns on a session: each session is
/// expected to be driven by one in-flight request at a time, and the
/// lock makes an overlapping second caller wait rather than interleave.
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// All live conversations of this process.
pub struct ConversationRegistry {
    conversations: DashMap<String, SharedConversation>,
    settings: ConversationSettings,
}

impl ConversationRegistry {
    pub fn new(settings: ConversationSettings) -> Self {
        Self {
            conversations: DashMap::new(),
            settings,
        }
    }

    /// Create a fresh conversation under a time-derived id.
    pub fn create(&self) -> (String, SharedConversation) {
        let id = Utc::now().timestamp_millis().to_string();
        let conversation = Arc::new(Mutex::new(Conversation::new(self.settings)));
        self.conversations.insert(id.clone(), Arc::clone(&conversation));
        (id, conversation)
    }

    pub fn get(&self, id: &str) -> Option<SharedConversation> {
        self.conversations
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
