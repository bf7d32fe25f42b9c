//! Soulcard API Routes
//!
//! - /health - Liveness probe
//! - /api/card, /api/diagnosis, /api/fortune-card - Card generation
//! - /api/daily-fortune - Daily fortune (八字 + 星座)
//! - /api/calendar - Local birth chart, no model call
//! - /api/chat, /api/personality/* - Persona chat and personality card
//! - /swagger-ui - OpenAPI UI

pub mod card;
pub mod fortune;
pub mod health;
pub mod personality;
pub mod swagger;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::AppState;

/// Full router with docs, CORS and request tracing
pub fn app(state: AppState) -> Router {
    let openapi = swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health::health_check))
        .merge(card::router())
        .merge(fortune::router())
        .merge(personality::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use soulcard::{
        ChatCompletionClient, ChatMessage, CompletionConfig, CompletionError,
        CompletionOptions, CompletionProvider,
    };
    use tower::ServiceExt;

    use super::*;

    /// Returns canned replies in order
    #[derive(Default)]
    struct StubProvider {
        replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    }

    impl StubProvider {
        fn reply(self, text: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
            self
        }

        fn fail(self, err: CompletionError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<String, CompletionError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CompletionError::Network("no scripted reply".into())))
        }

        fn model_id(&self) -> &str {
            "stub"
        }
    }

    fn app_with(provider: StubProvider) -> Router {
        app(AppState::new(Arc::new(provider)))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn card_json() -> Value {
        json!({
            "title": "周会纪要",
            "summary": "讨论了排期",
            "tags": ["会议", "排期", "产品"],
            "colorTheme": "blue",
            "borderColor": "#3B82F6"
        })
    }

    fn diagnosis_json() -> Value {
        json!({
            "emotionType": "anxiety",
            "title": "焦虑小怪兽",
            "analysis": "你在担心还没发生的事",
            "tags": ["内耗", "失眠"],
            "emotionColor": "#F59E0B",
            "suggestions": ["早点睡"],
            "intensity": 72
        })
    }

    fn personality_json() -> Value {
        json!({
            "title": "社恐观察家",
            "rarity": "SR",
            "analysis": {
                "comment": "话少但句句到位",
                "hobbies": ["看展", "撸猫"],
                "compatible": "安静的人"
            },
            "stats": {
                "introversion": 88,
                "creativity": 60,
                "humor": 45,
                "logic": 70,
                "empathy": 65,
                "energy": 30
            },
            "visual": {
                "bgColor": "#0F172A",
                "primaryColor": "#38BDF8",
                "secondaryColor": "#E2E8F0"
            }
        })
    }

    fn daily_fortune_json() -> Value {
        json!({
            "date": "随便",
            "zodiac": "随便",
            "zodiacIcon": "?",
            "overallScore": 85,
            "loveStars": 4,
            "careerStars": 5,
            "wealthStars": 3,
            "keywords": ["顺利"],
            "luckyItem": "钢笔",
            "luckyColor": "天蓝",
            "luckyColorHex": "#87CEEB",
            "shouldDo": ["整理房间"],
            "shouldNotDo": ["熬夜"],
            "zodiacFortune": "星象平稳",
            "zodiacAnimalFortune": "属相有助",
            "loveFortune": "桃花微开",
            "careerFortune": "稳中有进",
            "wealthFortune": "小有进账",
            "themeColor": "#000000",
            "name": "模型起的名"
        })
    }

    /// Four completed exchanges, ready for the fifth user turn
    fn four_exchanges() -> Value {
        let mut turns = Vec::new();
        for i in 1..=4 {
            turns.push(json!({"role": "user", "content": format!("问题{i}")}));
            turns.push(json!({"role": "assistant", "content": format!("回答{i}")}));
        }
        Value::Array(turns)
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(app_with(StubProvider::default()), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_lists_routes() {
        let response = send(
            app_with(StubProvider::default()),
            Method::GET,
            "/api-docs/openapi.json",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/card"].is_object());
        assert!(doc["paths"]["/api/personality/turn"].is_object());
        assert!(doc["paths"]["/api/calendar"].is_object());
    }

    #[tokio::test]
    async fn test_card_returns_validated_object() {
        let provider = StubProvider::default().reply(format!("```json\n{}\n```", card_json()));
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/card",
            Some(json!({"text": "今天开了周会"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, card_json());
    }

    #[tokio::test]
    async fn test_card_empty_text_is_bad_request() {
        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/card",
            Some(json!({"text": "   "})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/card",
            Some(json!({"content": "wrong field"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn test_upstream_401_maps_to_bad_gateway() {
        let provider = StubProvider::default().fail(CompletionError::Upstream {
            status: 401,
            message: "Authentication Fails".into(),
            code: None,
        });
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/diagnosis",
            Some(json!({"text": "好累", "mode": "savage"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "unauthorized");
        assert!(body["error"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_429() {
        let provider = StubProvider::default().fail(CompletionError::Upstream {
            status: 429,
            message: "Too Many Requests".into(),
            code: None,
        });
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/card",
            Some(json!({"text": "hi"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_service_unavailable() {
        let client = ChatCompletionClient::new(CompletionConfig::default());
        let app = app(AppState::new(Arc::new(client)));
        let response = send(app, Method::POST, "/api/card", Some(json!({"text": "hi"}))).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["kind"], "config");
    }

    #[tokio::test]
    async fn test_fortune_card_echoes_diagnosis() {
        let drifted = json!({
            "date": "2000年1月1日",
            "title": "慢下来",
            "emotionType": "joy",
            "analysis": "模型改写的分析",
            "fortune": {"overall": "稳", "love": "甜", "career": "忙", "health": "睡"},
            "tags": ["别的"],
            "emotionColor": "#10B981",
            "suggestions": ["别的建议"],
            "intensity": 10
        });
        let provider = StubProvider::default().reply(drifted.to_string());
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/fortune-card",
            Some(json!({"diagnosis": diagnosis_json()})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let source = diagnosis_json();
        for field in ["emotionType", "analysis", "tags", "emotionColor", "suggestions", "intensity"] {
            assert_eq!(body[field], source[field], "{field} should echo the diagnosis");
        }
        assert_eq!(body["title"], "慢下来");
        assert_ne!(body["date"], "2000年1月1日");
    }

    #[tokio::test]
    async fn test_fortune_card_rejects_out_of_range_diagnosis() {
        let mut diagnosis = diagnosis_json();
        diagnosis["intensity"] = json!(250);
        diagnosis["tags"] = json!([]);
        diagnosis["emotionColor"] = json!("not-a-color");

        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/fortune-card",
            Some(json!({"diagnosis": diagnosis})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "invalid_input");
        assert!(body["error"].as_str().unwrap().contains("intensity"));
    }

    #[tokio::test]
    async fn test_daily_fortune_stamps_identity() {
        let provider = StubProvider::default().reply(daily_fortune_json().to_string());
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/daily-fortune",
            Some(json!({
                "name": "张三",
                "birthDate": "1995-06-15",
                "birthTime": "午时",
                "targetDate": "2025-01-15"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "张三");
        assert_eq!(body["birthTime"], "午");
        assert_eq!(body["date"], "2025年1月15日星期三");
        assert_eq!(body["zodiac"], "双子座");
        assert_eq!(body["themeColor"], "#10b981");
    }

    #[tokio::test]
    async fn test_daily_fortune_rejects_unknown_branch() {
        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/daily-fortune",
            Some(json!({"name": "张三", "birthDate": "1995-06-15", "birthTime": "noon"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calendar_is_local() {
        let response = send(
            app_with(StubProvider::default()),
            Method::GET,
            "/api/calendar?birthDate=2000-01-01&birthTime=zi",
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["zodiac"], "摩羯座");
        assert_eq!(body["zodiacAnimal"], "龙");
        assert_eq!(body["pillars"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_calendar_rejects_bad_date() {
        let response = send(
            app_with(StubProvider::default()),
            Method::GET,
            "/api/calendar?birthDate=2000-13-01&birthTime=zi",
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_requires_user_last() {
        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/chat",
            Some(json!({"messages": four_exchanges()})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_reply() {
        let provider = StubProvider::default().reply("  哈哈，你这是典型的打工人  ");
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/chat",
            Some(json!({"messages": [{"role": "user", "content": "好累"}], "mode": "tea"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["reply"], "哈哈，你这是典型的打工人");
    }

    #[tokio::test]
    async fn test_fifth_turn_returns_profile() {
        let provider = StubProvider::default()
            .reply("最后一个回答")
            .reply(personality_json().to_string());
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/personality/turn",
            Some(json!({"messages": four_exchanges(), "message": "问题5"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 10);
        assert_eq!(body["reply"], "最后一个回答");
        assert_eq!(body["profile"]["title"], "社恐观察家");
        assert!(body.get("profileError").is_none());
    }

    #[tokio::test]
    async fn test_failed_profile_keeps_turn() {
        let provider = StubProvider::default()
            .reply("最后一个回答")
            .fail(CompletionError::Timeout(std::time::Duration::from_secs(30)));
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/personality/turn",
            Some(json!({"messages": four_exchanges(), "message": "问题5"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 10);
        assert!(body.get("profile").is_none());
        assert_eq!(body["profileError"]["kind"], "timeout");
    }

    #[tokio::test]
    async fn test_sixth_user_turn_is_rejected() {
        let mut turns = four_exchanges().as_array().unwrap().clone();
        turns.push(json!({"role": "user", "content": "问题5"}));
        turns.push(json!({"role": "assistant", "content": "回答5"}));

        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/personality/turn",
            Some(json!({"messages": turns, "message": "问题6"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_order_transcript_is_rejected() {
        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/personality/report",
            Some(json!({"messages": [{"role": "assistant", "content": "你好"}]})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_needs_a_user_turn() {
        let response = send(
            app_with(StubProvider::default()),
            Method::POST,
            "/api/personality/report",
            Some(json!({"messages": []})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn test_early_report() {
        let provider = StubProvider::default().reply(personality_json().to_string());
        let response = send(
            app_with(provider),
            Method::POST,
            "/api/personality/report",
            Some(json!({
                "messages": [
                    {"role": "user", "content": "我周末只想躺着"},
                    {"role": "assistant", "content": "懂了，电量不足型"}
                ],
                "mode": "cute"
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["rarity"], "SR");
    }
}
