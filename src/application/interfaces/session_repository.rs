use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConversationSession, DomainError};

/// Shared handle to one live session. The mutex serializes exchanges within
/// that session; different sessions never share a lock.
pub type SessionHandle = Arc<Mutex<ConversationSession>>;

/// Holds the live conversation sessions of a surface until they are deleted or
/// evicted for idleness.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save(&self, session: ConversationSession) -> Result<SessionHandle, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<SessionHandle>, DomainError>;

    /// Returns `true` when a session was removed.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;

    /// Removes sessions idle for at least `max_idle`. Sessions with an exchange
    /// in flight are kept. Returns the number removed.
    async fn evict_idle(&self, max_idle: Duration) -> Result<usize, DomainError>;
}
