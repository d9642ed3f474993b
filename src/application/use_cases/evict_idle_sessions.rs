use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::application::SessionRepository;
use crate::domain::DomainError;

/// Drops sessions whose page went away without ending them.
pub struct EvictIdleSessionsUseCase {
    session_repo: Arc<dyn SessionRepository>,
}

impl EvictIdleSessionsUseCase {
    pub fn new(session_repo: Arc<dyn SessionRepository>) -> Self {
        Self { session_repo }
    }

    /// Returns the number of sessions evicted.
    pub async fn execute(&self, max_idle: Duration) -> Result<usize, DomainError> {
        let evicted = self.session_repo.evict_idle(max_idle).await?;
        let live = self.session_repo.count().await?;

        if evicted > 0 {
            info!("Evicted {} idle sessions ({} live)", evicted, live);
        } else {
            debug!("No idle sessions to evict ({} live)", live);
        }

        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::InMemorySessionRepository;
    use crate::domain::ConversationSession;

    #[tokio::test]
    async fn test_evicts_idle_and_keeps_fresh_sessions() {
        let repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        repo.save(ConversationSession::new()).await.unwrap();
        let use_case = EvictIdleSessionsUseCase::new(repo.clone());

        assert_eq!(use_case.execute(Duration::from_secs(60)).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 1);

        assert_eq!(use_case.execute(Duration::ZERO).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
