//! Conversation message model for Valet.
//!
//! `Message` is the tagged representation of one conversation turn. User and
//! assistant turns carry structured `MessageContent`; anything that fails to
//! classify is preserved as `Invalid` for diagnostics instead of being
//! silently dropped.
//!
//! The mapping from history to provider wire messages is a partial, filtering
//! map: a message that resolves to no textual content is never sent.

use serde::{Deserialize, Serialize};

use crate::llm::{ProviderMessage, ProviderRole};

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_t", content = "content")]
pub enum Message {
    /// A system instruction, plain text.
    System(String),
    /// A user turn.
    User(MessageContent),
    /// An assistant turn.
    Ai(MessageContent),
    /// A payload that failed to classify. Kept for diagnostics,
    /// never sent to a provider.
    Invalid(serde_json::Value),
}

/// The content of a user or assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_t", content = "value")]
pub enum MessageContent {
    Text(String),
    Metadata(Vec<MessageMetadata>),
    Invalid(String),
}

/// One item of structured content. Only `Text` contributes to the
/// flattened text form today; the rest is passed through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_t", content = "value")]
pub enum MessageMetadata {
    Text(String),
    Image(String),
    ImageData(String),
    Invalid(String),
}

impl Message {
    /// Build a user message from plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Message::User(MessageContent::Text(text.into()))
    }

    /// Build an assistant message from plain text.
    pub fn ai(text: impl Into<String>) -> Self {
        Message::Ai(MessageContent::Text(text.into()))
    }

    /// Extract the textual form of this message, if it has one.
    ///
    /// System yields its content verbatim. User/Ai yield the flattened text
    /// of their content. Invalid yields `None`.
    pub fn text(&self) -> Option<String> {
        match self {
            Message::System(content) => Some(content.clone()),
            Message::User(content) | Message::Ai(content) => content.text(),
            Message::Invalid(_) => None,
        }
    }

    /// Convert to the provider wire form.
    ///
    /// Returns `None` for content that resolves to no text; such messages
    /// must be filtered out of a provider call, never sent. Content that
    /// flattens to an empty string counts as textless here: a `Metadata`
    /// list with no text items produces nothing to send.
    pub fn to_provider(&self) -> Option<ProviderMessage> {
        match self {
            Message::System(content) => {
                Some(ProviderMessage::new(ProviderRole::System, content.clone()))
            }
            Message::User(content) => content
                .text()
                .filter(|text| !text.is_empty())
                .map(|text| ProviderMessage::new(ProviderRole::User, text)),
            Message::Ai(content) => content
                .text()
                .filter(|text| !text.is_empty())
                .map(|text| ProviderMessage::new(ProviderRole::Assistant, text)),
            Message::Invalid(_) => None,
        }
    }

    /// Classify a provider wire message back into the domain model.
    ///
    /// Total: anything that is not a system, user, or assistant message
    /// becomes `Invalid` carrying the raw payload.
    pub fn from_provider(message: ProviderMessage) -> Message {
        match message.role {
            ProviderRole::System => Message::System(message.content),
            ProviderRole::User => Message::User(MessageContent::Text(message.content)),
            ProviderRole::Assistant => Message::Ai(MessageContent::Text(message.content)),
            ProviderRole::Tool => {
                let raw = serde_json::to_value(&message).unwrap_or_default();
                Message::Invalid(raw)
            }
        }
    }
}

impl MessageContent {
    /// Flatten this content into plain text, if possible.
    ///
    /// `Metadata` joins its text items with newlines and ignores everything
    /// else; `Invalid` yields `None`.
    pub fn text(&self) -> Option<String> {
        match self {
            MessageContent::Text(value) => Some(value.clone()),
            MessageContent::Metadata(items) => {
                let mut out = String::new();
                for item in items {
                    if let MessageMetadata::Text(value) = item {
                        out.push('\n');
                        out.push_str(value);
                    }
                }
                Some(out)
            }
            MessageContent::Invalid(_) => None,
        }
    }
}
