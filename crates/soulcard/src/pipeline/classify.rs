//! Maps pipeline failures to the user-facing error taxonomy.
//!
//! Classification reads HTTP status codes and the upstream error `code`.
//! The message substring probe for insufficient balance is a compatibility
//! shim for providers that report it only in prose.

use crate::domain::errors::{
    CompletionError, ErrorKind, Feature, FeatureError, PipelineError, TranscriptError,
};

const BALANCE_PHRASES: [&str; 2] = ["Insufficient Balance", "余额不足"];
const RECHARGE_URL: &str = "https://platform.deepseek.com/";
/// Violations listed in a validation message before it is cut short
const MAX_LISTED_VIOLATIONS: usize = 3;

pub fn classify(feature: Feature, error: &PipelineError) -> FeatureError {
    match error {
        PipelineError::Completion(err) => classify_completion(feature, err),
        PipelineError::Parse(err) => FeatureError::new(
            ErrorKind::Parse,
            format!("数据解析失败: {}。请重试。", err.source),
        ),
        PipelineError::Validation(errs) => {
            let mut listed: Vec<String> = errs
                .iter()
                .take(MAX_LISTED_VIOLATIONS)
                .map(|v| v.to_string())
                .collect();
            if errs.len() > MAX_LISTED_VIOLATIONS {
                listed.push(format!("等 {} 处", errs.len()));
            }
            FeatureError::new(
                ErrorKind::Validation,
                format!(
                    "{}失败：AI 返回的数据格式不符合要求（{}），请重试。",
                    feature.label(),
                    listed.join("; ")
                ),
            )
        }
        PipelineError::Transcript(err) => {
            FeatureError::new(ErrorKind::InvalidInput, transcript_message(err))
        }
        PipelineError::InvalidInput(message) => {
            FeatureError::new(ErrorKind::InvalidInput, message.clone())
        }
    }
}

fn classify_completion(feature: Feature, error: &CompletionError) -> FeatureError {
    match error {
        CompletionError::Config(_) => FeatureError::new(
            ErrorKind::Config,
            "DEEPSEEK_API_KEY 环境变量未设置，请联系管理员配置后重试。",
        ),
        CompletionError::Timeout(limit) => FeatureError::new(
            ErrorKind::Timeout,
            format!(
                "请求超时：DeepSeek API 响应时间超过 {} 秒，请稍后重试。",
                limit.as_secs()
            ),
        ),
        CompletionError::Upstream {
            status,
            message,
            code,
        } => classify_upstream(feature, *status, message, code.as_deref()),
        CompletionError::Network(detail) => FeatureError::new(
            ErrorKind::Network,
            format!("网络请求失败: {}。请检查网络连接或稍后重试。", detail),
        ),
        CompletionError::MalformedResponse(_) => FeatureError::new(
            ErrorKind::MalformedResponse,
            "DeepSeek API 返回的数据格式不正确，请稍后重试。",
        ),
        CompletionError::Cancelled => FeatureError::new(ErrorKind::Cancelled, "请求已取消。"),
    }
}

fn is_insufficient_balance(status: u16, message: &str, code: Option<&str>) -> bool {
    status == 402
        || code.is_some_and(|c| c.to_ascii_lowercase().contains("insufficient"))
        || BALANCE_PHRASES.iter().any(|p| message.contains(p))
}

fn classify_upstream(
    feature: Feature,
    status: u16,
    message: &str,
    code: Option<&str>,
) -> FeatureError {
    if is_insufficient_balance(status, message, code) {
        return FeatureError::new(
            ErrorKind::InsufficientBalance,
            format!("账户余额不足！请访问 {} 充值账户余额。", RECHARGE_URL),
        );
    }

    match status {
        401 => FeatureError::new(
            ErrorKind::Unauthorized,
            "API Key 认证失败 (401)。请检查 DEEPSEEK_API_KEY 是否正确。",
        ),
        404 => FeatureError::new(
            ErrorKind::NotFound,
            format!(
                "API 端点未找到 (404)。请检查：1) API Key 是否有效 2) 服务地址是否配置正确 3) 账户余额是否充足。详情: {}",
                message
            ),
        ),
        429 => FeatureError::new(ErrorKind::RateLimited, "请求频率过高 (429)。请稍后再试。"),
        _ => FeatureError::new(
            ErrorKind::Upstream,
            format!(
                "{}失败：DeepSeek API 请求失败 ({}): {}",
                feature.label(),
                status,
                message
            ),
        ),
    }
}

fn transcript_message(error: &TranscriptError) -> String {
    match error {
        TranscriptError::OutOfOrder { position, .. } => {
            format!("对话记录顺序不正确（第 {} 条），请重新开始对话。", position + 1)
        }
        TranscriptError::EmptyTurn => "消息不能为空。".to_string(),
        TranscriptError::TooManyTurns { max } => {
            format!("已经完成 {} 轮对话，请直接生成人格卡片。", max)
        }
        TranscriptError::NoUserTurns => "至少需要一轮对话才能生成人格卡片。".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{ParseError, ValidationErrors};
    use std::time::Duration;

    fn upstream(status: u16, message: &str, code: Option<&str>) -> PipelineError {
        PipelineError::Completion(CompletionError::Upstream {
            status,
            message: message.to_string(),
            code: code.map(str::to_string),
        })
    }

    fn kind_of(error: PipelineError) -> ErrorKind {
        classify(Feature::NoteCard, &error).kind
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(kind_of(upstream(401, "Authentication Fails", None)), ErrorKind::Unauthorized);
        assert_eq!(kind_of(upstream(404, "Not Found", None)), ErrorKind::NotFound);
        assert_eq!(kind_of(upstream(429, "Too Many Requests", None)), ErrorKind::RateLimited);
        assert_eq!(kind_of(upstream(500, "boom", None)), ErrorKind::Upstream);
    }

    #[test]
    fn test_balance_detection() {
        assert_eq!(kind_of(upstream(402, "", None)), ErrorKind::InsufficientBalance);
        assert_eq!(
            kind_of(upstream(400, "x", Some("insufficient_quota"))),
            ErrorKind::InsufficientBalance
        );
        // prose-only providers
        assert_eq!(
            kind_of(upstream(400, "Insufficient Balance", None)),
            ErrorKind::InsufficientBalance
        );
        assert_eq!(kind_of(upstream(500, "账户余额不足", None)), ErrorKind::InsufficientBalance);
    }

    #[test]
    fn test_upstream_message_carries_status_and_detail() {
        let err = classify(Feature::Diagnosis, &upstream(503, "overloaded", None));
        assert!(err.message.contains("503"));
        assert!(err.message.contains("overloaded"));
        assert!(err.message.starts_with("情绪诊断"));
    }

    #[test]
    fn test_transport_kinds() {
        assert_eq!(
            kind_of(CompletionError::Config("missing".into()).into()),
            ErrorKind::Config
        );
        let timeout = classify(
            Feature::Chat,
            &CompletionError::Timeout(Duration::from_secs(30)).into(),
        );
        assert_eq!(timeout.kind, ErrorKind::Timeout);
        assert!(timeout.message.contains("30 秒"));
        assert_eq!(
            kind_of(CompletionError::Network("reset".into()).into()),
            ErrorKind::Network
        );
        assert_eq!(
            kind_of(CompletionError::MalformedResponse("no content".into()).into()),
            ErrorKind::MalformedResponse
        );
        assert_eq!(kind_of(CompletionError::Cancelled.into()), ErrorKind::Cancelled);
    }

    #[test]
    fn test_parse_and_validation() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parse = classify(Feature::NoteCard, &ParseError::new("{", source).into());
        assert_eq!(parse.kind, ErrorKind::Parse);
        assert!(parse.message.starts_with("数据解析失败"));

        let mut errs = ValidationErrors::new("Diagnosis");
        errs.push("intensity", "is required");
        let validation = classify(Feature::Diagnosis, &errs.into());
        assert_eq!(validation.kind, ErrorKind::Validation);
        assert!(validation.message.contains("intensity: is required"));
    }

    #[test]
    fn test_validation_message_is_capped() {
        let mut errs = ValidationErrors::new("Card");
        for field in ["a", "b", "c", "d", "e"] {
            errs.push(field, "is required");
        }
        let err = classify(Feature::NoteCard, &errs.into());
        assert!(err.message.contains("等 5 处"));
        assert!(!err.message.contains("d: is required"));
    }

    #[test]
    fn test_transcript_errors_are_invalid_input() {
        let err = classify(
            Feature::Personality,
            &TranscriptError::TooManyTurns { max: 5 }.into(),
        );
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(err.message.contains('5'));
    }
}
