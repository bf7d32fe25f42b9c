//! EmotionType - Mood classification shared by Diagnosis and FortuneCard

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dominant emotion detected in the user's text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmotionType {
    Anxiety,
    Lovebrain,
    Emo,
    Happy,
    Confused,
    Angry,
    Sad,
    Excited,
}

impl EmotionType {
    pub const NAMES: [&'static str; 8] = [
        "anxiety", "lovebrain", "emo", "happy", "confused", "angry", "sad", "excited",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionType::Anxiety => "anxiety",
            EmotionType::Lovebrain => "lovebrain",
            EmotionType::Emo => "emo",
            EmotionType::Happy => "happy",
            EmotionType::Confused => "confused",
            EmotionType::Angry => "angry",
            EmotionType::Sad => "sad",
            EmotionType::Excited => "excited",
        }
    }
}

impl std::fmt::Display for EmotionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmotionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anxiety" => Ok(EmotionType::Anxiety),
            "lovebrain" => Ok(EmotionType::Lovebrain),
            "emo" => Ok(EmotionType::Emo),
            "happy" => Ok(EmotionType::Happy),
            "confused" => Ok(EmotionType::Confused),
            "angry" => Ok(EmotionType::Angry),
            "sad" => Ok(EmotionType::Sad),
            "excited" => Ok(EmotionType::Excited),
            _ => Err(format!("Unknown emotion type: {}", s)),
        }
    }
}
