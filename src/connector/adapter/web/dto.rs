use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Turn};

/// A session as returned by the JSON API.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    /// Session id, used in every follow-up request
    pub id: String,

    /// Full role-tagged history, oldest first
    pub history: Vec<Turn>,
}

/// Body of `POST /api/sessions/{id}/messages`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageInput {
    /// The user's new message
    pub message: String,

    /// Credential for the completion provider; kept by the page, never stored here
    #[serde(default)]
    pub api_key: String,
}

/// Result of a successful exchange.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageOutput {
    pub reply: String,
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Human-readable message, safe to show to the user
    pub error: String,

    /// Machine-readable error kind (e.g. `authentication`, `transport`)
    pub kind: String,
}

impl From<&DomainError> for ErrorOutput {
    fn from(err: &DomainError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}
