use async_trait::async_trait;

use crate::domain::{ClientConfig, DomainError, Turn};

/// Turns a conversation history plus a new user message into one reply from a
/// remote chat-completion model.
///
/// Implementors hold no session state between calls and never retry. The
/// credential and connection parameters arrive with every call in `config`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `history` followed by `new_user_text` and return the model's reply.
    ///
    /// Must fail with [`DomainError::Authentication`] before any network I/O
    /// when `config` carries no credential.
    async fn complete(
        &self,
        history: &[Turn],
        new_user_text: &str,
        config: &ClientConfig,
    ) -> Result<String, DomainError>;

    /// Human-readable name used in logs.
    fn name(&self) -> &str;
}
