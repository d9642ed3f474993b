use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::connector::api::Container;
use crate::domain::DomainError;

use super::dto::{ErrorOutput, MessageInput, MessageOutput, SessionView};

const INDEX_HTML: &str = include_str!("index.html");

/// Wraps a [`DomainError`] so handlers can use `?` and still answer with a
/// JSON error body and a matching status code.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::ExchangeInProgress(_) => StatusCode::CONFLICT,
            DomainError::Transport(_) | DomainError::Service(_) => StatusCode::BAD_GATEWAY,
            DomainError::IoError(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, self.0);
        }
        (status, Json(ErrorOutput::from(&self.0))).into_response()
    }
}

/// Browser chat surface: one HTML page plus a small JSON API over the session
/// use cases. Each browser tab creates its own session on load.
#[derive(Clone)]
pub struct ChatWebServer {
    container: Arc<Container>,
}

impl ChatWebServer {
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/health", get(health))
            .route("/api/sessions", post(create_session))
            .route(
                "/api/sessions/{id}",
                get(get_session).delete(delete_session),
            )
            .route("/api/sessions/{id}/messages", post(send_message))
            .with_state(Arc::clone(&self.container))
    }

    /// Serve until Ctrl-C, evicting idle sessions in the background.
    pub async fn serve(&self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Chat surface listening on http://{}", listener.local_addr()?);

        let sweeper = self.spawn_session_sweeper();
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweeper.abort();
        served?;

        info!("Chat surface stopped");
        Ok(())
    }

    /// Periodically evicts sessions idle for longer than the container's TTL.
    /// The first sweep runs immediately.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let container = Arc::clone(&self.container);
        let ttl = container.session_ttl();
        let period = sweep_period(ttl);

        tokio::spawn(async move {
            let evict = container.evict_idle_sessions_use_case();
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = evict.execute(ttl).await {
                    warn!("Session eviction failed: {}", e);
                }
            }
        })
    }
}

fn sweep_period(ttl: Duration) -> Duration {
    (ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(60))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_session(
    State(container): State<Arc<Container>>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let session = container.start_session_use_case().execute().await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionView {
            id: session.id().to_string(),
            history: session.snapshot_history(),
        }),
    ))
}

async fn get_session(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let history = container.session_history_use_case().execute(&id).await?;
    Ok(Json(SessionView { id, history }))
}

async fn delete_session(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    container.end_session_use_case().execute(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn send_message(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
    Json(input): Json<MessageInput>,
) -> Result<Json<MessageOutput>, ApiError> {
    let config = container.client_config().with_api_key(input.api_key);

    let outcome = container
        .send_message_use_case()
        .execute(&id, &input.message, &config)
        .await?;

    Ok(Json(MessageOutput {
        reply: outcome.reply,
        history: outcome.history,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_kind() {
        let cases = [
            (DomainError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (DomainError::authentication("x"), StatusCode::UNAUTHORIZED),
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::exchange_in_progress("x"), StatusCode::CONFLICT),
            (DomainError::transport("x"), StatusCode::BAD_GATEWAY),
            (DomainError::service("x"), StatusCode::BAD_GATEWAY),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn sweep_period_is_bounded() {
        assert_eq!(sweep_period(Duration::ZERO), Duration::from_secs(1));
        assert_eq!(sweep_period(Duration::from_secs(40)), Duration::from_secs(10));
        assert_eq!(sweep_period(Duration::from_secs(3600)), Duration::from_secs(60));
    }

    #[test]
    fn index_page_carries_chat_ui() {
        assert!(INDEX_HTML.contains("克隆ChatGPT"));
        assert!(INDEX_HTML.contains("/api/sessions"));
    }
}
