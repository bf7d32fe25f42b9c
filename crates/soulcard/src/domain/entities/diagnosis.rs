//! Diagnosis - Mood analysis of a piece of user text

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::EmotionType;

/// Result of the mood "diagnosis" feature.
///
/// A FortuneCard derived from this value must echo its emotion fields unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub emotion_type: EmotionType,
    pub title: String,
    pub analysis: String,
    /// 2 to 5 tags
    pub tags: Vec<String>,
    #[schema(example = "#F59E0B")]
    pub emotion_color: String,
    /// 1 to 3 suggestions
    pub suggestions: Vec<String>,
    /// 0 to 100
    pub intensity: u8,
}
