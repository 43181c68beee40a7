//! Shared domain types for Valet.
//!
//! This crate contains the core domain types used across the Valet backend:
//! conversation messages, provider wire messages, push events, tool
//! descriptors, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod event;
pub mod llm;
pub mod message;
pub mod tool;
