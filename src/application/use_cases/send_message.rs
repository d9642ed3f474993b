use std::sync::Arc;

use serde::Serialize;

use crate::application::{ChatExchangeUseCase, CompletionClient, SessionRepository};
use crate::domain::{ClientConfig, DomainError, Turn};

/// Reply plus the session history after the exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeOutcome {
    pub reply: String,
    pub history: Vec<Turn>,
}

/// Runs one exchange against a stored session, addressed by id.
///
/// A session only processes one exchange at a time: a message arriving while
/// the previous one is still waiting on the model is rejected with
/// [`DomainError::ExchangeInProgress`] instead of being queued.
pub struct SendMessageUseCase {
    session_repo: Arc<dyn SessionRepository>,
    exchange: ChatExchangeUseCase,
}

impl SendMessageUseCase {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            session_repo,
            exchange: ChatExchangeUseCase::new(client),
        }
    }

    pub async fn execute(
        &self,
        session_id: &str,
        user_text: &str,
        config: &ClientConfig,
    ) -> Result<ExchangeOutcome, DomainError> {
        let handle = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Session not found: {}", session_id)))?;

        let mut session = handle.try_lock().map_err(|_| {
            DomainError::exchange_in_progress(format!(
                "Session {} is still waiting for a reply",
                session_id
            ))
        })?;

        let reply = self.exchange.execute(&mut session, user_text, config).await?;

        Ok(ExchangeOutcome {
            reply,
            history: session.snapshot_history(),
        })
    }
}
