//! Soulcard API Client

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use soulcard::{
    Card, ChatMode, ConversationTurn, DailyFortune, Diagnosis, DiagnosisMode, FortuneCard,
    PersonalityCard,
};

/// API Client for Soulcard
pub struct SoulcardClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Request / Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<DiagnosisMode>,
}

#[derive(Debug, Serialize)]
struct FortuneCardRequest<'a> {
    diagnosis: &'a Diagnosis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyFortuneRequest<'a> {
    name: &'a str,
    birth_date: NaiveDate,
    birth_time: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct TurnRequest<'a> {
    messages: &'a [ConversationTurn],
    message: &'a str,
    mode: ChatMode,
}

#[derive(Debug, Serialize)]
struct ReportRequest<'a> {
    messages: &'a [ConversationTurn],
    mode: ChatMode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub messages: Vec<ConversationTurn>,
    pub reply: String,
    pub profile: Option<PersonalityCard>,
    pub profile_error: Option<ErrorBody>,
}

/// Error for a non-success response, preferring the server's `{error, kind}` body
pub fn api_error(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => anyhow!("{} [{}]", err.error, err.kind),
        Err(_) => anyhow!("API error ({}): {}", status, body),
    }
}

impl SoulcardClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to Soulcard API at {}", self.base_url))?;

        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        resp.json().await.context("Failed to parse response")
    }

    pub async fn card(&self, text: &str) -> Result<Card> {
        self.post("/api/card", &TextRequest { text, mode: None })
            .await
    }

    pub async fn diagnose(&self, text: &str, mode: DiagnosisMode) -> Result<Diagnosis> {
        self.post(
            "/api/diagnosis",
            &TextRequest {
                text,
                mode: Some(mode),
            },
        )
        .await
    }

    pub async fn fortune_card(&self, diagnosis: &Diagnosis) -> Result<FortuneCard> {
        self.post("/api/fortune-card", &FortuneCardRequest { diagnosis })
            .await
    }

    pub async fn daily_fortune(
        &self,
        name: &str,
        birth_date: NaiveDate,
        birth_time: &str,
        target_date: Option<NaiveDate>,
    ) -> Result<DailyFortune> {
        let request = DailyFortuneRequest {
            name,
            birth_date,
            birth_time,
            target_date,
        };
        self.post("/api/daily-fortune", &request).await
    }

    /// Submit one user message with the transcript so far
    pub async fn personality_turn(
        &self,
        messages: &[ConversationTurn],
        message: &str,
        mode: ChatMode,
    ) -> Result<TurnResponse> {
        let request = TurnRequest {
            messages,
            message,
            mode,
        };
        self.post("/api/personality/turn", &request).await
    }

    /// Build the card now instead of waiting for the fifth reply
    pub async fn personality_report(
        &self,
        messages: &[ConversationTurn],
        mode: ChatMode,
    ) -> Result<PersonalityCard> {
        self.post("/api/personality/report", &ReportRequest { messages, mode })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_server_body() {
        let err = api_error(
            StatusCode::BAD_GATEWAY,
            r#"{"error":"API 密钥无效 (401)","kind":"unauthorized"}"#,
        );
        assert_eq!(err.to_string(), "API 密钥无效 (401) [unauthorized]");
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::NOT_FOUND, "Not Found");
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_turn_request_shape() {
        let messages = vec![ConversationTurn::user("你好"), ConversationTurn::assistant("嗨")];
        let body = serde_json::to_value(TurnRequest {
            messages: &messages,
            message: "在吗",
            mode: ChatMode::Cute,
        })
        .unwrap();
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["mode"], "cute");
    }

    #[test]
    fn test_daily_fortune_request_is_camel_case() {
        let body = serde_json::to_value(DailyFortuneRequest {
            name: "张三",
            birth_date: NaiveDate::from_ymd_opt(1995, 6, 15).unwrap(),
            birth_time: "午",
            target_date: None,
        })
        .unwrap();
        assert_eq!(body["birthDate"], "1995-06-15");
        assert_eq!(body["birthTime"], "午");
        assert!(body.get("targetDate").is_none());
    }
}
