use serde::{Deserialize, Serialize};
use soulcard::{Diagnosis, DiagnosisMode};
use utoipa::ToSchema;

/// Text to turn into a note card
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisRequest {
    pub text: String,
    /// Defaults to `gentle`
    #[serde(default)]
    pub mode: Option<DiagnosisMode>,
}

/// A diagnosis previously returned by `/api/diagnosis`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FortuneCardRequest {
    pub diagnosis: Diagnosis,
}
