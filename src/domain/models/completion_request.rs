use crate::domain::DomainError;

use super::Turn;

/// Everything the completion client needs for one exchange, minus connection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    prior_turns: Vec<Turn>,
    new_user_text: String,
}

impl CompletionRequest {
    /// Fails with [`DomainError::InvalidInput`] when `new_user_text` is blank.
    pub fn new(prior_turns: Vec<Turn>, new_user_text: impl Into<String>) -> Result<Self, DomainError> {
        let new_user_text: String = new_user_text.into();
        if new_user_text.trim().is_empty() {
            return Err(DomainError::invalid_input("user text must not be empty"));
        }
        Ok(Self {
            prior_turns,
            new_user_text,
        })
    }

    pub fn prior_turns(&self) -> &[Turn] {
        &self.prior_turns
    }

    pub fn new_user_text(&self) -> &str {
        &self.new_user_text
    }

    /// The full message list sent to the provider: prior turns in order, then
    /// the new user turn.
    pub fn messages(&self) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.prior_turns.len() + 1);
        messages.extend(self.prior_turns.iter().cloned());
        messages.push(Turn::user(self.new_user_text.clone()));
        messages
    }
}
