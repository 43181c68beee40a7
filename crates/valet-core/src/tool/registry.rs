//! Tool trait, type-erased wrapper, and the registry handed to the model.
//!
//! The registry owns the tools and the catalog advertised to the provider.
//! Catalog order is registration order, so the model always sees a stable
//! tool list across rounds.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use valet_types::tool::{ToolError, ToolSpec};

/// A capability the model may invoke during a chat round.
///
/// Uses native async fn in traits (RPITIT); `BoxTool` provides the
/// object-safe wrapper for heterogeneous storage in the registry.
///
/// Implementations live in valet-infra (e.g., `RunCli`).
pub trait Tool: Send + Sync {
    /// The descriptor advertised to the model.
    fn spec(&self) -> &ToolSpec;

    /// Execute with the model-supplied arguments.
    ///
    /// Failures are returned as `ToolError`; the loop feeds the error
    /// text back to the model instead of aborting the round.
    fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, ToolError>> + Send;
}

/// Object-safe version of [`Tool`] with boxed futures.
pub trait ToolDyn: Send + Sync {
    fn spec(&self) -> &ToolSpec;

    fn execute_boxed(
        &self,
        arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>>;
}

impl<T: Tool> ToolDyn for T {
    fn spec(&self) -> &ToolSpec {
        Tool::spec(self)
    }

    fn execute_boxed(
        &self,
        arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
        Box::pin(self.execute(arguments))
    }
}

/// Type-erased tool, so the registry can hold a heterogeneous set.
pub struct BoxTool {
    inner: Box<dyn ToolDyn + Send + Sync>,
}

impl BoxTool {
    pub fn new<T: Tool + 'static>(tool: T) -> Self {
        Self {
            inner: Box::new(tool),
        }
    }

    pub fn spec(&self) -> &ToolSpec {
        self.inner.spec()
    }

    pub async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        self.inner.execute_boxed(arguments).await
    }
}

/// The set of tools offered to the model for one assistant.
///
/// An empty registry is valid: summarization and reading run without
/// any tools on offer.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, BoxTool>,
    /// Catalog in registration order.
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A later registration under the same name
    /// replaces the earlier one in the lookup map but keeps the
    /// catalog position of the first.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let spec = tool.spec().clone();
        if !self.tools.contains_key(&spec.name) {
            self.specs.push(spec.clone());
        }
        self.tools.insert(spec.name, BoxTool::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&BoxTool> {
        self.tools.get(name)
    }

    /// The catalog advertised on every provider request.
    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Render a tool's output for the provider wire.
///
/// Strings pass through verbatim; anything else is pretty-printed JSON.
pub fn render_tool_output(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
