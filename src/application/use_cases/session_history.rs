use std::sync::Arc;

use crate::application::SessionRepository;
use crate::domain::{DomainError, Turn};

pub struct SessionHistoryUseCase {
    session_repo: Arc<dyn SessionRepository>,
}

impl SessionHistoryUseCase {
    pub fn new(session_repo: Arc<dyn SessionRepository>) -> Self {
        Self { session_repo }
    }

    /// Waits for any in-flight exchange on the session to finish, so the
    /// returned history never shows half an exchange.
    pub async fn execute(&self, id: &str) -> Result<Vec<Turn>, DomainError> {
        let handle = self
            .session_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Session not found: {}", id)))?;

        let session = handle.lock().await;
        Ok(session.snapshot_history())
    }
}
