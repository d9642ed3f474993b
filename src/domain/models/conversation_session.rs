use std::time::{Duration, Instant};

use uuid::Uuid;

use super::Turn;

/// Greeting every new session starts with.
pub const GREETING: &str = "有何贵干";

/// Ordered, append-only turn history for one user session.
///
/// Never empty: construction seeds a single assistant greeting. Turns are only
/// ever appended, so insertion order is chronological order.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: String,
    last_active: Instant,
    history: Vec<Turn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            last_active: Instant::now(),
            history: vec![Turn::assistant(GREETING)],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.history.push(Turn::user(text));
        self.last_active = Instant::now();
    }

    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.history.push(Turn::assistant(text));
        self.last_active = Instant::now();
    }

    /// Appends the user turn and the reply to it as one step.
    pub fn record_exchange(&mut self, user_text: impl Into<String>, reply: impl Into<String>) {
        self.append_user_turn(user_text);
        self.append_assistant_turn(reply);
    }

    pub fn snapshot_history(&self) -> Vec<Turn> {
        self.history.clone()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Time since the session was created or last gained a turn.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
