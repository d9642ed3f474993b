use std::sync::Arc;

use tracing::info;

use crate::application::SessionRepository;
use crate::domain::{ConversationSession, DomainError};

pub struct StartSessionUseCase {
    session_repo: Arc<dyn SessionRepository>,
}

impl StartSessionUseCase {
    pub fn new(session_repo: Arc<dyn SessionRepository>) -> Self {
        Self { session_repo }
    }

    /// Registers a fresh greeting-seeded session and returns a copy of it.
    pub async fn execute(&self) -> Result<ConversationSession, DomainError> {
        let session = ConversationSession::new();
        let snapshot = session.clone();

        self.session_repo.save(session).await?;
        info!("Started session {}", snapshot.id());

        Ok(snapshot)
    }
}
