use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{ClientConfig, CompletionRequest, DomainError, Turn};

/// Offline [`CompletionClient`] used by `--mock` and by tests.
///
/// Replies are taken from a scripted queue; once the queue is empty the client
/// echoes the user text. It enforces the same preconditions as the HTTP
/// client and records every request that passes them.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<Result<String, DomainError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock_script().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: DomainError) {
        self.lock_script().push_back(Err(error));
    }

    /// Number of `complete` invocations, including ones rejected up front.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests that passed validation, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock_requests().clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests().pop()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, DomainError>>> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<CompletionRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn echo(text: &str) -> String {
        format!("(mock) 你说的是：{}", text)
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        history: &[Turn],
        new_user_text: &str,
        config: &ClientConfig,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        config.require_credential()?;
        let request = CompletionRequest::new(history.to_vec(), new_user_text)?;

        debug!(
            "MockCompletionClient: {} prior turns, new text {} chars",
            request.prior_turns().len(),
            new_user_text.chars().count()
        );

        self.lock_requests().push(request);

        match self.lock_script().pop_front() {
            Some(scripted) => scripted,
            None => Ok(Self::echo(new_user_text)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
