//! Conversation - Caller-owned transcript of the personality chat

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::TranscriptError;
use crate::ports::services::ChatMessage;

/// User turns needed before the profile is generated automatically
pub const REQUIRED_USER_TURNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered chat history.
///
/// Always starts with a user turn and alternates user/assistant. The server
/// holds no session state, so the caller sends the whole transcript back on
/// every request and [`Transcript::from_turns`] re-checks the shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<ConversationTurn>) -> Result<Self, TranscriptError> {
        let mut transcript = Self::new();
        for turn in turns {
            match turn.role {
                TurnRole::User => transcript.push_user(turn.content)?,
                TurnRole::Assistant => transcript.push_assistant(turn.content)?,
            }
        }
        Ok(transcript)
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<ConversationTurn> {
        self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_role(&self) -> Option<TurnRole> {
        self.turns.last().map(|t| t.role)
    }

    pub fn user_turns(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role == TurnRole::User)
            .count()
    }

    /// Five user turns, each answered
    pub fn is_complete(&self) -> bool {
        self.user_turns() >= REQUIRED_USER_TURNS && self.last_role() == Some(TurnRole::Assistant)
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> Result<(), TranscriptError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(TranscriptError::EmptyTurn);
        }
        if self.last_role() == Some(TurnRole::User) {
            return Err(TranscriptError::OutOfOrder {
                position: self.turns.len(),
                expected: TurnRole::Assistant,
            });
        }
        if self.user_turns() >= REQUIRED_USER_TURNS {
            return Err(TranscriptError::TooManyTurns {
                max: REQUIRED_USER_TURNS,
            });
        }
        self.turns.push(ConversationTurn::user(content));
        Ok(())
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> Result<(), TranscriptError> {
        if self.last_role() != Some(TurnRole::User) {
            return Err(TranscriptError::OutOfOrder {
                position: self.turns.len(),
                expected: TurnRole::User,
            });
        }
        self.turns.push(ConversationTurn::assistant(content));
        Ok(())
    }

    /// Drop a trailing user turn that never got an answer
    pub(crate) fn rollback_user(&mut self) {
        if self.last_role() == Some(TurnRole::User) {
            self.turns.pop();
        }
    }

    /// Plain-text rendering used as the profile prompt body
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| match t.role {
                TurnRole::User => format!("用户: {}", t.content),
                TurnRole::Assistant => format!("AI: {}", t.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_chat_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .map(|t| match t.role {
                TurnRole::User => ChatMessage::user(t.content.clone()),
                TurnRole::Assistant => ChatMessage::assistant(t.content.clone()),
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for Transcript {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let turns = Vec::<ConversationTurn>::deserialize(deserializer)?;
        Transcript::from_turns(turns).map_err(serde::de::Error::custom)
    }
}
