//! Orchestration engine for the Valet backend.
//!
//! This crate defines the "ports" (the `ChatModel`, `TokenCounter`, `Tool`
//! and `Ai` traits) that the infrastructure layer implements, plus the
//! engine built on top of them: the tool-calling loop, the bounded
//! conversation, the chat service, and the push-event broadcaster. It
//! depends only on `valet-types` -- never on any HTTP or IO crate.

pub mod agent;
pub mod chat;
pub mod event;
pub mod llm;
pub mod tool;
