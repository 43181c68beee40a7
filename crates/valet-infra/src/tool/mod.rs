//! Built-in tools offered to the model.

pub mod cli;
pub mod web;

use std::sync::Arc;

use valet_core::tool::ToolRegistry;

/// Build the default registry: shell access and web fetching.
pub fn default_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(cli::RunCli::new());
    registry.register(web::FetchWebPage::new());
    Arc::new(registry)
}
