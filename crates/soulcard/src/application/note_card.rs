//! Note-to-card summarizer

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{FeatureRunner, JSON_ONLY};
use crate::domain::entities::Card;
use crate::domain::errors::{Feature, FeatureError, PipelineError};
use crate::ports::services::CompletionProvider;

/// Moderate: favours a consistent structure
pub const NOTE_CARD_TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str =
    "你是一个笔记整理专家，请分析用户的输入，提取关键信息并按照 JSON 格式输出。";

fn user_prompt(text: &str) -> String {
    format!(
        r##"请分析以下笔记内容，并按照以下 JSON 格式输出（必须是有效的 JSON，不要包含任何其他文字）：

{{
  "title": "精炼的标题",
  "summary": "内容摘要",
  "tags": ["标签1", "标签2", "标签3"],
  "colorTheme": "blue|green|red|purple|yellow",
  "borderColor": "#颜色值"
}}

用户输入：
{text}

请根据输入内容：
1. 生成一个精炼的标题（title）
2. 生成内容摘要（summary）
3. 提取3个相关标签（tags）
4. 根据内容情绪选择颜色主题（colorTheme）：blue（平静/专业）、green（积极/成长）、red（重要/紧急）、purple（创意/灵感）、yellow（提醒/注意）
5. 生成对应的 hex 颜色值（borderColor）

{JSON_ONLY}"##
    )
}

/// Summarizes free text into a [`Card`]
pub struct NoteCardService<P: CompletionProvider + ?Sized> {
    runner: FeatureRunner<P>,
}

impl<P: CompletionProvider + ?Sized> NoteCardService<P> {
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

    pub async fn generate(&self, text: &str) -> Result<Card, FeatureError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.runner.fail(
                Feature::NoteCard,
                PipelineError::InvalidInput("笔记内容不能为空。".to_string()),
            ));
        }

        let card: Card = self
            .runner
            .structured(
                Feature::NoteCard,
                SYSTEM_PROMPT,
                &user_prompt(text),
                NOTE_CARD_TEMPERATURE,
            )
            .await?;

        info!(title = %card.title, theme = %card.color_theme, "Note card generated");
        Ok(card)
    }
}
