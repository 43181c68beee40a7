//! Provider wire types for Valet.
//!
//! These types model the data shapes exchanged with a language-model
//! provider: wire messages, tool-call requests, and provider errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A token count that may be unknown.
///
/// `None` means "unknown/poisoned": no tokenizer was available for the
/// active model, so the count cannot be trusted. Unknown is propagated,
/// never coerced to zero.
pub type Tokens = Option<u64>;

/// Role of a message on the provider wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    System,
    User,
    Assistant,
    Tool,
}

impl ProviderRole {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderRole::System => "system",
            ProviderRole::User => "user",
            ProviderRole::Assistant => "assistant",
            ProviderRole::Tool => "tool",
        }
    }
}

impl fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(ProviderRole::System),
            "user" => Ok(ProviderRole::User),
            "assistant" => Ok(ProviderRole::Assistant),
            "tool" => Ok(ProviderRole::Tool),
            other => Err(format!("invalid provider role: '{other}'")),
        }
    }
}

/// A single message on the provider wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: ProviderRole,
    pub content: String,
    /// Correlation id, set only on tool-result messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ProviderMessage {
    /// Build a plain wire message with no tool correlation.
    pub fn new(role: ProviderRole, content: String) -> Self {
        Self {
            role,
            content,
            tool_call_id: None,
        }
    }

    /// Build a tool-result message tagged with the originating call id.
    pub fn tool_result(content: String, tool_call_id: String) -> Self {
        Self {
            role: ProviderRole::Tool,
            content,
            tool_call_id: Some(tool_call_id),
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned correlation id. Absent ids are diagnosed,
    /// never silently dropped.
    pub id: Option<String>,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// One provider response: the new message plus any tool-call requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTurn {
    pub message: ProviderMessage,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl ModelTurn {
    /// A plain assistant reply with no tool calls.
    pub fn reply(content: impl Into<String>) -> Self {
        Self {
            message: ProviderMessage::new(ProviderRole::Assistant, content.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// Errors from provider operations.
///
/// A provider failure is not recovered at the orchestration layer: it
/// aborts the in-progress round and propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("model returned no choices")]
    EmptyResponse,
}
