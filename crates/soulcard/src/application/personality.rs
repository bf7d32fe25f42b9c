//! Personality profiling: five-turn chat followed by a profile card

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{FeatureRunner, JSON_ONLY};
use crate::domain::entities::{PersonalityCard, Transcript, TurnRole};
use crate::domain::errors::{Feature, FeatureError, PipelineError, TranscriptError};
use crate::domain::value_objects::ChatMode;
use crate::ports::services::{ChatMessage, CompletionProvider};

pub const CHAT_TEMPERATURE: f32 = 0.8;
/// Higher for more varied profiles
pub const PROFILE_TEMPERATURE: f32 = 0.9;

fn profile_system_prompt(mode: ChatMode, turns: usize) -> String {
    format!(
        "{}\n\n根据以下{}轮对话，分析用户的人格特征，生成一张人格卡片。要求：\n1. 文案必须犀利、幽默、有网感，严禁使用教科书式的心理学术语\n2. 根据对话内容随机确定最突出的人格特征\n3. 每个人都要不一样，不要模板化",
        mode.persona(),
        turns
    )
}

fn profile_user_prompt(history: &str) -> String {
    format!(
        r##"请根据以下对话记录，生成人格卡片数据（必须是有效的 JSON，不要包含任何其他文字）：

对话记录：
{history}

请按照以下 JSON 格式输出：

{{
  "title": "人格标题（有趣、有网感，如'社恐但话痨'、'表面佛系内心卷王'）",
  "rarity": "N|R|SR|SSR|UR（根据人格稀有度）",
  "analysis": {{
    "comment": "毒舌判词（200-300字，犀利幽默，有网感）",
    "hobbies": ["可能的爱好1", "可能的爱好2", "可能的爱好3"],
    "compatible": "和什么人格的人比较合（如'同样社恐的'、'能接住你梗的'）"
  }},
  "stats": {{
    "introversion": 0-100 的整数（内向程度）,
    "creativity": 0-100 的整数（创造力）,
    "humor": 0-100 的整数（幽默感）,
    "logic": 0-100 的整数（逻辑性）,
    "empathy": 0-100 的整数（共情力）,
    "energy": 0-100 的整数（能量值）
  }},
  "visual": {{
    "bgColor": "#颜色值（根据人格选择背景色）",
    "primaryColor": "#颜色值（主色调）",
    "secondaryColor": "#颜色值（辅助色）"
  }}
}}

要求：
1. 标题要有趣、有网感，不要用"内向型"、"外向型"这种术语
2. 判词要犀利幽默，可以带网络梗
3. 稀有度根据人格的独特程度判断
4. 数据要真实反映对话中表现出的人格
5. 颜色要根据人格特征选择（如社恐用冷色，活泼用暖色）

{JSON_ONLY}"##
    )
}

/// Result of one submitted chat turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    /// Present once the fifth reply lands. A failed profile call does not
    /// undo the turn, so the caller can retry via the report endpoint.
    pub profile: Option<Result<PersonalityCard, FeatureError>>,
}

/// Drives the chat and the profile generation. Holds no session state:
/// the caller owns the [`Transcript`].
pub struct PersonalityService<P: CompletionProvider + ?Sized> {
    runner: FeatureRunner<P>,
}

impl<P: CompletionProvider + ?Sized> PersonalityService<P> {
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

    /// Assistant reply to a transcript whose last turn is the user's
    pub async fn reply(&self, transcript: &Transcript, mode: ChatMode) -> Result<String, FeatureError> {
        if transcript.last_role() != Some(TurnRole::User) {
            return Err(self.runner.fail(
                Feature::Chat,
                PipelineError::InvalidInput("最后一条消息必须来自用户。".to_string()),
            ));
        }

        let mut messages = Vec::with_capacity(transcript.turns().len() + 1);
        messages.push(ChatMessage::system(mode.persona()));
        messages.extend(transcript.to_chat_messages());

        self.runner
            .chat(Feature::Chat, &messages, CHAT_TEMPERATURE)
            .await
    }

    /// Append a user message, fetch the reply and, after the fifth reply,
    /// generate the profile.
    ///
    /// If the reply fails the user turn is rolled back, leaving the
    /// transcript as it was.
    pub async fn submit_turn(
        &self,
        transcript: &mut Transcript,
        message: &str,
        mode: ChatMode,
    ) -> Result<TurnOutcome, FeatureError> {
        transcript
            .push_user(message.trim())
            .map_err(|err| self.runner.fail(Feature::Chat, err))?;

        let reply = match self.reply(transcript, mode).await {
            Ok(reply) => reply,
            Err(err) => {
                transcript.rollback_user();
                return Err(err);
            }
        };
        transcript
            .push_assistant(reply.clone())
            .map_err(|err| self.runner.fail(Feature::Chat, err))?;

        info!(
            mode = %mode,
            user_turns = transcript.user_turns(),
            "Chat turn completed"
        );

        let profile = if transcript.is_complete() {
            Some(self.generate_profile(transcript, mode).await)
        } else {
            None
        };

        Ok(TurnOutcome { reply, profile })
    }

    /// Profile from the transcript so far. Needs at least one user turn,
    /// so it also serves as the early "report now" trigger.
    pub async fn generate_profile(
        &self,
        transcript: &Transcript,
        mode: ChatMode,
    ) -> Result<PersonalityCard, FeatureError> {
        let turns = transcript.user_turns();
        if turns == 0 {
            return Err(self
                .runner
                .fail(Feature::Personality, TranscriptError::NoUserTurns));
        }

        let card: PersonalityCard = self
            .runner
            .structured(
                Feature::Personality,
                &profile_system_prompt(mode, turns),
                &profile_user_prompt(&transcript.render()),
                PROFILE_TEMPERATURE,
            )
            .await?;

        info!(title = %card.title, rarity = %card.rarity, turns, "Personality card generated");
        Ok(card)
    }
}
