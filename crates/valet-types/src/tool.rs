//! Tool descriptor types for Valet.
//!
//! A tool is a named external capability the model may invoke. `ToolSpec`
//! is the provider-facing description; the executable side lives behind
//! the `Tool` trait in valet-core.

use serde::{Deserialize, Serialize};

/// Provider-facing description of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Stable, unique tool name (e.g. "run_cli").
    pub name: String,
    /// Natural-language description for the model.
    pub instruction: String,
    /// JSON schema of the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A tool's fallible outcome, as text for the model.
///
/// The message is fed back to the model verbatim on the next round, so it
/// should be descriptive enough to reason about the failure cause. A tool
/// failure never aborts the tool loop.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ToolError(pub String);

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
