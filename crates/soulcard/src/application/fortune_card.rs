//! Fortune card derived from a prior diagnosis

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{FeatureRunner, JSON_ONLY};
use crate::domain::entities::{Diagnosis, FortuneCard};
use crate::domain::errors::{Feature, FeatureError, PipelineError};
use crate::domain::services::format_chinese_date;
use crate::pipeline::validate;
use crate::ports::services::CompletionProvider;

pub const FORTUNE_CARD_TEMPERATURE: f32 = 0.8;

const SYSTEM_PROMPT: &str = "你是一个专业的情感分析师，擅长根据情绪状态提供建议和洞察。你的风格是专业、温暖、有建设性，能够帮助用户更好地理解自己的情感状态。";

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn user_prompt(diagnosis: &Diagnosis, date: &str) -> String {
    format!(
        r##"根据以下情绪诊断结果，生成一张情感分析卡片（必须是有效的 JSON，不要包含任何其他文字）：

情绪诊断：
- 情绪类型：{emotion}
- 标题：{title}
- 分析：{analysis}
- 情绪强度：{intensity}%

请按照以下 JSON 格式输出：

{{
  "date": "{date}",
  "title": "情感分析卡片标题（一句话，温暖有洞察）",
  "emotionType": "{emotion}",
  "analysis": "{analysis}",
  "fortune": {{
    "overall": "整体运势（50-100字，神秘有趣）",
    "love": "感情运势（50-100字）",
    "career": "事业运势（50-100字）",
    "health": "健康运势（50-100字）"
  }},
  "tags": {tags},
  "emotionColor": "{color}",
  "suggestions": {suggestions},
  "intensity": {intensity}
}}

要求：
1. 运势分析要结合情绪状态，神秘有趣，有建设性
2. 不要用过于迷信的语言，要有现代感
3. 整体运势要概括，其他三项要具体

{JSON_ONLY}"##,
        emotion = diagnosis.emotion_type,
        title = diagnosis.title,
        analysis = diagnosis.analysis,
        intensity = diagnosis.intensity,
        tags = json_list(&diagnosis.tags),
        color = diagnosis.emotion_color,
        suggestions = json_list(&diagnosis.suggestions),
    )
}

/// Extends a [`Diagnosis`] into a four-part fortune
pub struct FortuneCardService<P: CompletionProvider + ?Sized> {
    runner: FeatureRunner<P>,
}

impl<P: CompletionProvider + ?Sized> FortuneCardService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            runner: FeatureRunner::new(provider),
        }
    }

    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            runner: self.runner.cancel_on(token),
        }
    }

    /// The returned card always echoes `diagnosis` exactly and carries `today`.
    ///
    /// The diagnosis usually comes back from a client, so it is checked
    /// against its own schema before any upstream call.
    pub async fn generate(
        &self,
        diagnosis: &Diagnosis,
        today: NaiveDate,
    ) -> Result<FortuneCard, FeatureError> {
        check_source(diagnosis).map_err(|err| self.runner.fail(Feature::FortuneCard, err))?;

        let date = format_chinese_date(today);

        let card: FortuneCard = self
            .runner
            .structured_with(
                Feature::FortuneCard,
                SYSTEM_PROMPT,
                &user_prompt(diagnosis, &date),
                FORTUNE_CARD_TEMPERATURE,
                |value| {
                    if pin_echoed_fields(value, diagnosis, &date) {
                        warn!("Fortune card drifted from its diagnosis, restoring echoed fields");
                    }
                },
            )
            .await?;

        let card = card.align_with(diagnosis);
        info!(title = %card.title, emotion = %card.emotion_type, "Fortune card generated");
        Ok(card)
    }
}

fn check_source(diagnosis: &Diagnosis) -> Result<(), PipelineError> {
    let value = serde_json::to_value(diagnosis)
        .map_err(|err| PipelineError::InvalidInput(format!("情绪诊断无法读取：{err}")))?;
    validate::<Diagnosis>(value).map(|_| ()).map_err(|errors| {
        let detail = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        PipelineError::InvalidInput(format!("情绪诊断数据不合法（{detail}），请重新诊断。"))
    })
}

/// Overwrite the fields copied from the diagnosis, plus `date`, in the raw
/// model output. Returns whether any of them differed.
fn pin_echoed_fields(value: &mut Value, source: &Diagnosis, date: &str) -> bool {
    let Some(object) = value.as_object_mut() else {
        return false;
    };

    let pinned = [
        ("emotionType", json!(source.emotion_type)),
        ("analysis", json!(source.analysis)),
        ("tags", json!(source.tags)),
        ("emotionColor", json!(source.emotion_color)),
        ("suggestions", json!(source.suggestions)),
        ("intensity", json!(source.intensity)),
    ];

    let mut drifted = false;
    for (key, expected) in pinned {
        drifted |= object.get(key) != Some(&expected);
        object.insert(key.to_string(), expected);
    }
    object.insert("date".to_string(), json!(date));
    drifted
}
