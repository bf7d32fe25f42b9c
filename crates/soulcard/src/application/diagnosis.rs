//! Mood diagnosis

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{FeatureRunner, JSON_ONLY};
use crate::domain::entities::Diagnosis;
use crate::domain::errors::{Feature, FeatureError, PipelineError};
use crate::domain::value_objects::{DiagnosisMode, EmotionType};
use crate::ports::services::CompletionProvider;

fn system_prompt(mode: DiagnosisMode) -> &'static str {
    match mode {
        DiagnosisMode::Gentle => {
            "你是一个温柔的情绪观察者，擅长从文字里读出情绪。你的风格是温暖、共情、不评判，先接住对方的情绪，再给出轻柔可行的建议。"
        }
        DiagnosisMode::Savage => {
            "你是一个毒舌情绪诊断师，说话风格：犀利、一针见血、带点网络梗。你会直接戳穿对方的情绪真相，但建议必须真的有用。"
        }
    }
}

fn user_prompt(text: &str) -> String {
    let emotion_types = EmotionType::NAMES.join("|");
    format!(
        r##"请诊断以下文字背后的情绪状态，并按照以下 JSON 格式输出（必须是有效的 JSON，不要包含任何其他文字）：

{{
  "emotionType": "{emotion_types}",
  "title": "情绪诊断标题（一句话，有网感）",
  "analysis": "情绪分析（80-150字）",
  "tags": ["情绪标签1", "情绪标签2", "情绪标签3"],
  "emotionColor": "#颜色值（代表这种情绪的颜色）",
  "suggestions": ["建议1", "建议2", "建议3"],
  "intensity": 0-100 的整数（情绪强度）
}}

用户输入：
{text}

要求：
1. emotionType 只能从给定的 8 个值中选择一个
2. tags 2-5 个，suggestions 1-3 条
3. intensity 必须是 0 到 100 之间的整数

{JSON_ONLY}"##
    )
}

/// Diagnoses the mood behind a piece of text
pub struct DiagnosisService<P: CompletionProvider + ?Sized> {
    runner: FeatureRunner<P>,
}

impl<P: CompletionProvider + ?Sized> DiagnosisService<P> {
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

    pub async fn diagnose(&self, text: &str, mode: DiagnosisMode) -> Result<Diagnosis, FeatureError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.runner.fail(
                Feature::Diagnosis,
                PipelineError::InvalidInput("请输入想要诊断的内容。".to_string()),
            ));
        }

        let diagnosis: Diagnosis = self
            .runner
            .structured(
                Feature::Diagnosis,
                system_prompt(mode),
                &user_prompt(text),
                mode.temperature(),
            )
            .await?;

        info!(
            mode = %mode,
            emotion = %diagnosis.emotion_type,
            intensity = diagnosis.intensity,
            "Diagnosis generated"
        );
        Ok(diagnosis)
    }
}
