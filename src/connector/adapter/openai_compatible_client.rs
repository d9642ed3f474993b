use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{ClientConfig, CompletionRequest, DomainError, Turn};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Upper bound on how much of an error body ends up in logs and messages.
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat-completion APIs (Zhipu GLM, OpenAI,
/// LM Studio and similar servers).
///
/// Implements [`CompletionClient`]. The underlying `reqwest::Client` is reused
/// across calls for connection pooling; endpoint, model, temperature and the
/// bearer credential all come from the per-call [`ClientConfig`], so one
/// instance serves every session.
///
/// Failures map onto the domain taxonomy:
///
/// | Condition                                  | Error            |
/// |--------------------------------------------|------------------|
/// | empty credential (no request is sent)      | `Authentication` |
/// | HTTP 401 / 403                             | `Authentication` |
/// | connect / DNS / timeout / body read failure| `Transport`      |
/// | other non-2xx, malformed or empty payload  | `Service`        |
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    fn completions_url(config: &ClientConfig) -> String {
        format!("{}{}", config.endpoint(), CHAT_COMPLETIONS_PATH)
    }

    fn build_request<'a>(config: &'a ClientConfig, messages: &'a [Turn]) -> ApiRequest<'a> {
        ApiRequest {
            model: config.model_id(),
            temperature: config.temperature(),
            messages: messages
                .iter()
                .map(|turn| ApiMessage {
                    role: turn.role().as_str(),
                    content: turn.content(),
                })
                .collect(),
        }
    }

    /// Extract the first choice's text. A missing or blank reply counts as a
    /// malformed response.
    fn parse_reply(body: &[u8]) -> Result<String, DomainError> {
        let api_response: ApiResponse = serde_json::from_slice(body).map_err(|e| {
            DomainError::service(format!("OpenAiCompatibleClient: failed to parse response: {e}"))
        })?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(DomainError::service(
                "OpenAiCompatibleClient: response contained no reply text",
            ));
        }

        Ok(reply)
    }

    fn map_status(status: StatusCode, body: &str) -> DomainError {
        let body: String = body.chars().take(MAX_ERROR_BODY).collect();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::authentication(
                format!("OpenAiCompatibleClient: credential rejected ({status})"),
            ),
            _ => DomainError::service(format!(
                "OpenAiCompatibleClient: API returned {status}: {body}"
            )),
        }
    }
}

impl Default for OpenAiCompatibleClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(
        &self,
        history: &[Turn],
        new_user_text: &str,
        config: &ClientConfig,
    ) -> Result<String, DomainError> {
        config.require_credential()?;
        let request = CompletionRequest::new(history.to_vec(), new_user_text)?;

        let messages = request.messages();
        let body = Self::build_request(config, &messages);
        let url = Self::completions_url(config);

        debug!(
            "OpenAiCompatibleClient: POST {} (model={}, messages={})",
            url,
            config.model_id(),
            messages.len()
        );
        let start_time = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    DomainError::invalid_input(format!("OpenAiCompatibleClient: invalid request: {e}"))
                } else {
                    DomainError::transport(format!("OpenAiCompatibleClient: request failed: {e}"))
                }
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            DomainError::transport(format!("OpenAiCompatibleClient: failed to read response: {e}"))
        })?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            warn!("OpenAiCompatibleClient: API returned {status}");
            return Err(Self::map_status(status, &text));
        }

        let reply = Self::parse_reply(&bytes)?;
        debug!(
            "OpenAiCompatibleClient: reply received in {:?} ({} chars)",
            start_time.elapsed(),
            reply.chars().count()
        );

        Ok(reply)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reply_reads_first_choice() {
        let body = br#"{"choices":[{"index":0,"message":{"role":"assistant","content":"hello"}},
                        {"index":1,"message":{"role":"assistant","content":"ignored"}}]}"#;
        assert_eq!(OpenAiCompatibleClient::parse_reply(body).unwrap(), "hello");
    }

    #[test]
    fn parse_reply_rejects_missing_choices() {
        let err = OpenAiCompatibleClient::parse_reply(br#"{"choices":[]}"#).unwrap_err();
        assert!(err.is_service());

        let err = OpenAiCompatibleClient::parse_reply(br#"{"id":"x"}"#).unwrap_err();
        assert!(err.is_service());
    }

    #[test]
    fn parse_reply_rejects_null_or_blank_content() {
        let body = br#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(OpenAiCompatibleClient::parse_reply(body).unwrap_err().is_service());

        let body = br#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#;
        assert!(OpenAiCompatibleClient::parse_reply(body).unwrap_err().is_service());
    }

    #[test]
    fn parse_reply_rejects_non_json() {
        let err = OpenAiCompatibleClient::parse_reply(b"<html>bad gateway</html>").unwrap_err();
        assert!(err.is_service());
    }

    #[test]
    fn map_status_distinguishes_auth_failures() {
        assert!(OpenAiCompatibleClient::map_status(StatusCode::UNAUTHORIZED, "").is_authentication());
        assert!(OpenAiCompatibleClient::map_status(StatusCode::FORBIDDEN, "").is_authentication());
        assert!(OpenAiCompatibleClient::map_status(StatusCode::TOO_MANY_REQUESTS, "").is_service());
        assert!(OpenAiCompatibleClient::map_status(StatusCode::BAD_GATEWAY, "").is_service());
    }

    #[test]
    fn build_request_serializes_history_in_order() {
        let config = ClientConfig::new("http://x", "glm-4-flash", "k", 0.7).unwrap();
        let messages = vec![Turn::assistant("有何贵干"), Turn::user("hi")];

        let json = serde_json::to_value(OpenAiCompatibleClient::build_request(&config, &messages))
            .unwrap();

        assert_eq!(json["model"], "glm-4-flash");
        assert_eq!(json["messages"][0]["role"], "assistant");
        assert_eq!(json["messages"][0]["content"], "有何贵干");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn completions_url_appends_path() {
        let config = ClientConfig::default();
        assert_eq!(
            OpenAiCompatibleClient::completions_url(&config),
            "https://open.bigmodel.cn/api/paas/v4/chat/completions"
        );
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        // Unroutable endpoint: reaching the network would surface as Transport.
        let config = ClientConfig::new("http://127.0.0.1:9", "m", "", 0.7).unwrap();
        let client = OpenAiCompatibleClient::new();

        let err = client.complete(&[], "hello", &config).await.unwrap_err();
        assert!(err.is_authentication());
    }
}
