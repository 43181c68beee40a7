//! Infrastructure implementations for Valet.
//!
//! Everything here implements a port defined in `valet-core`: the
//! OpenAI-compatible chat model client, token counters, the built-in
//! tools, the background push jobs, and config loading.

pub mod background;
pub mod config;
pub mod instruction;
pub mod llm;
pub mod tool;
