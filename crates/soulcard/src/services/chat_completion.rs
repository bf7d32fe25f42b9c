//! Chat completion client over reqwest.
//!
//! Speaks the OpenAI-compatible `/chat/completions` shape. DeepSeek is the
//! default upstream, but any provider exposing the same request/response
//! body works by overriding the base URL and model.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::CompletionError;
use crate::ports::services::{ChatMessage, CompletionOptions, CompletionProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Prefix upstream keys are expected to carry; a mismatch only warns
pub const API_KEY_PREFIX: &str = "sk-";

/// Connection settings injected at construction time
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Read `DEEPSEEK_API_KEY`, `DEEPSEEK_BASE_URL`, `DEEPSEEK_MODEL` and
    /// `COMPLETION_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url =
            std::env::var("DEEPSEEK_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = std::env::var("COMPLETION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            api_key,
            base_url,
            model,
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// At most six leading characters, never more than half the key, plus the length
pub fn mask_api_key(key: &str) -> String {
    let len = key.chars().count();
    let prefix: String = key.chars().take((len / 2).min(6)).collect();
    format!("{}... (len {})", prefix, len)
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: UpstreamErrorBody,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// reqwest-backed [`CompletionProvider`]
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    async fn exchange(
        &self,
        request_id: Uuid,
        api_key: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                %request_id,
                status = status.as_u16(),
                latency_ms = started.elapsed().as_millis() as u64,
                body = %text,
                "Upstream returned an error status"
            );
            return Err(upstream_error(status, &text));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                CompletionError::MalformedResponse(err.to_string())
            } else {
                CompletionError::Network(err.to_string())
            }
        })?;

        let (prompt_tokens, completion_tokens) = payload
            .usage
            .as_ref()
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();
        let first = payload.choices.into_iter().next();
        let finish_reason = first
            .as_ref()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_default();
        let content = first
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                CompletionError::MalformedResponse(
                    "choices[0].message.content is missing".to_string(),
                )
            })?;

        info!(
            %request_id,
            upstream_id = payload.id.as_deref().unwrap_or("-"),
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            content_len = content.len(),
            prompt_tokens,
            completion_tokens,
            finish_reason = %finish_reason,
            "Completion received"
        );

        Ok(content)
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::Config("DEEPSEEK_API_KEY is not set".to_string()))?;

        if !api_key.starts_with(API_KEY_PREFIX) {
            warn!(
                api_key = %mask_api_key(api_key),
                "API key does not start with '{}', it may be malformed",
                API_KEY_PREFIX
            );
        }

        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            endpoint = %self.config.endpoint(),
            model = %self.config.model,
            api_key = %mask_api_key(api_key),
            temperature = options.temperature,
            messages = messages.len(),
            "Sending completion request"
        );

        // Dropping the exchange future aborts the underlying connection.
        let exchange = tokio::time::timeout(
            self.config.timeout,
            self.exchange(request_id, api_key, messages, options),
        );

        let outcome = match &options.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!(%request_id, "Completion request cancelled");
                        return Err(CompletionError::Cancelled);
                    }
                    outcome = exchange => outcome,
                }
            }
            None => exchange.await,
        };

        outcome.map_err(|_| {
            warn!(%request_id, timeout_secs = self.config.timeout.as_secs(), "Completion request timed out");
            CompletionError::Timeout(self.config.timeout)
        })?
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

fn upstream_error(status: StatusCode, body: &str) -> CompletionError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);

    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string());

    let code = parsed.and_then(|e| match e.code {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => e.kind,
    });

    CompletionError::Upstream {
        status: status.as_u16(),
        message,
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode as HttpStatus};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> ChatCompletionClient {
        ChatCompletionClient::new(CompletionConfig::new("sk-test-key").with_base_url(base_url))
    }

    fn error_route(status: HttpStatus, body: Value) -> Router {
        Router::new().route(
            "/chat/completions",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        )
    }

    fn prompt() -> Vec<ChatMessage> {
        vec![ChatMessage::system("sys"), ChatMessage::user("hi")]
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-1234567890"), "sk-123... (len 13)");
        assert_eq!(mask_api_key("abc"), "a... (len 3)");
        assert_eq!(mask_api_key("x"), "... (len 1)");
    }

    #[test]
    fn test_mask_api_key_hides_short_keys() {
        for key in ["ab", "abc", "abcdef", "sk-12", "sk-1234"] {
            let masked = mask_api_key(key);
            assert!(!masked.contains(key), "{key} leaked as {masked}");
        }
    }

    #[test]
    fn test_config_debug_masks_key() {
        let config = CompletionConfig::new("sk-supersecretvalue");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecretvalue"));
        assert!(debug.contains("sk-sup"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = CompletionConfig::default().with_base_url("http://localhost:9/v1/");
        assert_eq!(config.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_success_sends_expected_request() {
        let app = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let echo = format!(
                    "{}|{}|{}|{}",
                    auth,
                    body["model"].as_str().unwrap_or_default(),
                    body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
                    body["temperature"]
                );
                Json(json!({
                    "id": "cmpl-1",
                    "choices": [{"message": {"role": "assistant", "content": echo}, "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 3, "completion_tokens": 5, "total_tokens": 8}
                }))
            }),
        );
        let client = client_for(spawn_upstream(app).await);

        let text = client
            .complete(&prompt(), &CompletionOptions::with_temperature(0.5))
            .await
            .unwrap();
        assert_eq!(text, "Bearer sk-test-key|deepseek-chat|2|0.5");
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = ChatCompletionClient::new(
            CompletionConfig::default().with_base_url("http://127.0.0.1:9"),
        );
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Config(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let app = error_route(
            HttpStatus::UNAUTHORIZED,
            json!({"error": {"message": "Authentication Fails", "type": "authentication_error"}}),
        );
        let client = client_for(spawn_upstream(app).await);
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        match err {
            CompletionError::Upstream {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication Fails");
                assert_eq!(code.as_deref(), Some("authentication_error"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insufficient_balance_status() {
        let app = error_route(
            HttpStatus::PAYMENT_REQUIRED,
            json!({"error": {"message": "Insufficient Balance", "code": "insufficient_balance"}}),
        );
        let client = client_for(spawn_upstream(app).await);
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CompletionError::Upstream { status: 402, ref code, .. } if code.as_deref() == Some("insufficient_balance")
        ));
    }

    #[tokio::test]
    async fn test_rate_limited_without_json_body() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (HttpStatus::TOO_MANY_REQUESTS, "slow down") }),
        );
        let client = client_for(spawn_upstream(app).await);
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        match err {
            CompletionError::Upstream {
                status, message, code, ..
            } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too Many Requests");
                assert!(code.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let app = error_route(HttpStatus::OK, json!({"choices": []}));
        let client = client_for(spawn_upstream(app).await);
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": [{"message": {"content": "late"}}]}))
            }),
        );
        let client = ChatCompletionClient::new(
            CompletionConfig::new("sk-test")
                .with_base_url(spawn_upstream(app).await)
                .with_timeout(Duration::from_millis(100)),
        );
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Timeout(d) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_request() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": [{"message": {"content": "late"}}]}))
            }),
        );
        let client = client_for(spawn_upstream(app).await);
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = client
            .complete(&prompt(), &CompletionOptions::default().cancel_on(token))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let err = client
            .complete(&prompt(), &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Network(_)));
    }
}
