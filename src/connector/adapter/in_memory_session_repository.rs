use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{SessionHandle, SessionRepository};
use crate::domain::{ConversationSession, DomainError};

/// Process-local session store. Nothing survives a restart.
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<String, SessionHandle>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: ConversationSession) -> Result<SessionHandle, DomainError> {
        let id = session.id().to_string();
        let handle: SessionHandle = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&id) {
            return Err(DomainError::internal(format!("Session id collision: {}", id)));
        }
        sessions.insert(id.clone(), Arc::clone(&handle));

        debug!("Stored session {} ({} live)", id, sessions.len());
        Ok(handle)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<SessionHandle>, DomainError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.sessions.lock().await.len())
    }

    async fn evict_idle(&self, max_idle: Duration) -> Result<usize, DomainError> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        // A held session lock means an exchange is running; leave it alone.
        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(session) if session.idle_for() >= max_idle => {
                debug!("Evicting idle session {}", id);
                false
            }
            _ => true,
        });

        Ok(before - sessions.len())
    }
}
