//! FortuneCard - Emotion-linked mini fortune built on top of a Diagnosis

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::entities::Diagnosis;
use crate::domain::value_objects::EmotionType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FortuneCard {
    pub date: String,
    pub title: String,
    pub emotion_type: EmotionType,
    pub analysis: String,
    pub fortune: FortuneBreakdown,
    pub tags: Vec<String>,
    pub emotion_color: String,
    pub suggestions: Vec<String>,
    pub intensity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FortuneBreakdown {
    pub overall: String,
    pub love: String,
    pub career: String,
    pub health: String,
}

impl FortuneCard {
    /// Replace the echoed emotion fields with the source diagnosis.
    ///
    /// The model is asked to copy them but is not authoritative for them.
    pub fn align_with(self, source: &Diagnosis) -> Self {
        Self {
            emotion_type: source.emotion_type,
            analysis: source.analysis.clone(),
            tags: source.tags.clone(),
            emotion_color: source.emotion_color.clone(),
            suggestions: source.suggestions.clone(),
            intensity: source.intensity,
            ..self
        }
    }

    /// Whether every echoed field matches the diagnosis
    pub fn matches(&self, source: &Diagnosis) -> bool {
        self.emotion_type == source.emotion_type
            && self.analysis == source.analysis
            && self.tags == source.tags
            && self.emotion_color == source.emotion_color
            && self.suggestions == source.suggestions
            && self.intensity == source.intensity
    }
}
