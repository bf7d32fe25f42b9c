use serde::{Deserialize, Serialize};
use soulcard::{ChatMode, ConversationTurn, PersonalityCard, Transcript};
use utoipa::ToSchema;

use crate::error::ErrorResponse;

/// Transcript ending with the user's latest message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub messages: Vec<ConversationTurn>,
    #[serde(default)]
    pub mode: Option<ChatMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

/// Transcript so far plus the next user message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TurnRequest {
    #[serde(default)]
    pub messages: Vec<ConversationTurn>,
    pub message: String,
    #[serde(default)]
    pub mode: Option<ChatMode>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// Updated transcript, including the new user turn and the reply
    pub messages: Vec<ConversationTurn>,
    pub reply: String,
    /// Present once the fifth reply lands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<PersonalityCard>,
    /// Set when the profile call after the fifth reply failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_error: Option<ErrorResponse>,
}

/// Early profile trigger over a partial transcript
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportRequest {
    pub messages: Vec<ConversationTurn>,
    #[serde(default)]
    pub mode: Option<ChatMode>,
}

/// Turns posted by the client, checked for ordering
pub fn transcript_from(turns: Vec<ConversationTurn>) -> Result<Transcript, crate::error::ApiError> {
    use soulcard::domain::errors::PipelineError;
    use soulcard::{pipeline::classify, Feature};

    Transcript::from_turns(turns)
        .map_err(|e| classify(Feature::Chat, &PipelineError::from(e)).into())
}
