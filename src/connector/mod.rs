//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion (OpenAI-compatible HTTP client, offline mock)
//! - Session storage (in-memory)
//! - Chat surfaces (axum web page, terminal REPL via `api`)

pub mod adapter;
pub mod api;

pub use adapter::*;
