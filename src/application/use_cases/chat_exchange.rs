use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::CompletionClient;
use crate::domain::{ClientConfig, ConversationSession, DomainError};

/// One request/response exchange against a session: the boundary every chat
/// surface goes through.
///
/// Input is validated before the completion client is touched. On success the
/// user turn and the reply are appended together. On failure the session is
/// left exactly as it was, so history never drifts from what the model has
/// actually answered.
pub struct ChatExchangeUseCase {
    client: Arc<dyn CompletionClient>,
}

impl ChatExchangeUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        session: &mut ConversationSession,
        user_text: &str,
        config: &ClientConfig,
    ) -> Result<String, DomainError> {
        if user_text.trim().is_empty() {
            return Err(DomainError::invalid_input("message must not be empty"));
        }
        config.require_credential()?;

        let history = session.snapshot_history();
        debug!(
            "Session {}: sending {} prior turns to {}",
            session.id(),
            history.len(),
            self.client.name()
        );

        let start_time = Instant::now();
        let reply = match self.client.complete(&history, user_text, config).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Session {}: exchange failed: {}", session.id(), e);
                return Err(e);
            }
        };

        session.record_exchange(user_text, reply.clone());
        info!(
            "Session {}: exchange completed in {:?} ({} turns)",
            session.id(),
            start_time.elapsed(),
            session.len()
        );

        Ok(reply)
    }
}
