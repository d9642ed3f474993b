//! # Domain Layer
//!
//! Conversation model, connection parameters and the shared error type.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
