//! Tool abstraction and registry.

pub mod registry;

pub use registry::{BoxTool, Tool, ToolRegistry, render_tool_output};
