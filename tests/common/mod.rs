//! Local stand-in for an OpenAI-compatible provider, served by axum on an
//! ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Clone)]
pub enum Behavior {
    /// 200 with a well-formed completion carrying this text.
    Reply(String),
    /// Given status with a JSON error body.
    Status(u16),
    /// 200 with this raw body.
    Raw(String),
    /// Reply after sleeping.
    Delayed(Duration, String),
}

#[derive(Debug, Clone)]
pub struct Received {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ProviderState {
    behavior: Behavior,
    received: Arc<Mutex<Vec<Received>>>,
}

pub struct FakeProvider {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeProvider {
    pub async fn spawn(behavior: Behavior) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ProviderState {
            behavior,
            received: Arc::clone(&received),
        };

        let app = Router::new()
            .route("/v4/chat/completions", post(completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake provider");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake provider");
        });

        Self {
            base_url: format!("http://{}/v4", addr),
            received,
        }
    }

    pub fn requests(&self) -> Vec<Received> {
        self.received.lock().expect("lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.received.lock().expect("lock").len()
    }
}

pub fn completion_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "glm-4-flash",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": text }
        }]
    })
}

async fn completions(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state
        .received
        .lock()
        .expect("lock")
        .push(Received { authorization, body });

    match state.behavior {
        Behavior::Reply(text) => Json(completion_body(&text)).into_response(),
        Behavior::Status(code) => {
            let status = StatusCode::from_u16(code).expect("status");
            (status, Json(json!({ "error": { "message": "rejected" } }))).into_response()
        }
        Behavior::Raw(raw) => (StatusCode::OK, raw).into_response(),
        Behavior::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            Json(completion_body(&text)).into_response()
        }
    }
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}
