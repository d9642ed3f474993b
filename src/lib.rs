pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatExchangeUseCase, CompletionClient, EndSessionUseCase, ExchangeOutcome, SendMessageUseCase,
    SessionHandle, SessionHistoryUseCase, SessionRepository, StartSessionUseCase,
};

pub use cli::Commands;

pub use connector::api::{Container, ContainerConfig, Router};
pub use connector::{
    ChatWebServer, InMemorySessionRepository, MockCompletionClient, OpenAiCompatibleClient,
};

pub use domain::{
    ClientConfig, CompletionRequest, ConversationSession, DomainError, Role, Turn, GREETING,
};
