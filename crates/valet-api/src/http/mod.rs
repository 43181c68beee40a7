//! HTTP/REST API layer for Valet.
//!
//! Axum-based API: synchronous chat turns, a persistent SSE event
//! stream, and a health check.

pub mod error;
pub mod handlers;
pub mod router;
