use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ChatExchangeUseCase, CompletionClient, EndSessionUseCase, EvictIdleSessionsUseCase,
    SendMessageUseCase, SessionHistoryUseCase, SessionRepository, StartSessionUseCase,
};
use crate::connector::adapter::{
    InMemorySessionRepository, MockCompletionClient, OpenAiCompatibleClient, DEFAULT_TIMEOUT_SECS,
};
use crate::domain::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Web sessions untouched for this long are evicted.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

pub struct ContainerConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Overall HTTP timeout for one completion call.
    pub timeout_secs: u64,
    /// Idle time after which a web session is evicted.
    pub session_ttl_secs: u64,
    /// Answer from the offline mock client instead of the remote provider.
    pub mock: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            mock: false,
        }
    }
}

/// Wires the completion client, the session store and the use cases together.
/// Surfaces only talk to the container.
#[derive(Clone)]
pub struct Container {
    client: Arc<dyn CompletionClient>,
    session_repo: Arc<dyn SessionRepository>,
    /// Connection parameters without a credential; surfaces attach the key.
    client_config: ClientConfig,
    session_ttl: Duration,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let client_config =
            ClientConfig::new(&config.base_url, &config.model, "", config.temperature)?;

        let client: Arc<dyn CompletionClient> = if config.mock {
            debug!("Using mock completion client");
            Arc::new(MockCompletionClient::new())
        } else {
            debug!(
                "Using OpenAI-compatible client at {} (model {})",
                client_config.endpoint(),
                client_config.model_id()
            );
            Arc::new(OpenAiCompatibleClient::with_timeout(Duration::from_secs(
                config.timeout_secs.max(1),
            )))
        };

        Ok(Self::with_client(client, client_config)
            .with_session_ttl(Duration::from_secs(config.session_ttl_secs)))
    }

    /// Build around an existing client, e.g. a scripted mock in tests.
    pub fn with_client(client: Arc<dyn CompletionClient>, client_config: ClientConfig) -> Self {
        Self {
            client,
            session_repo: Arc::new(InMemorySessionRepository::new()),
            client_config,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn exchange_use_case(&self) -> ChatExchangeUseCase {
        ChatExchangeUseCase::new(self.client.clone())
    }

    pub fn send_message_use_case(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.session_repo.clone(), self.client.clone())
    }

    pub fn start_session_use_case(&self) -> StartSessionUseCase {
        StartSessionUseCase::new(self.session_repo.clone())
    }

    pub fn session_history_use_case(&self) -> SessionHistoryUseCase {
        SessionHistoryUseCase::new(self.session_repo.clone())
    }

    pub fn end_session_use_case(&self) -> EndSessionUseCase {
        EndSessionUseCase::new(self.session_repo.clone())
    }

    pub fn evict_idle_sessions_use_case(&self) -> EvictIdleSessionsUseCase {
        EvictIdleSessionsUseCase::new(self.session_repo.clone())
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.client_config
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}
