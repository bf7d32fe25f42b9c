//! FortuneTier - Score band that fixes the daily fortune theme color

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Band of an overall fortune score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FortuneTier {
    /// 80 and above
    Excellent,
    /// 60..=79
    Good,
    /// 40..=59
    Fair,
    /// below 40
    Poor,
}

impl FortuneTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => FortuneTier::Excellent,
            60..=79 => FortuneTier::Good,
            40..=59 => FortuneTier::Fair,
            _ => FortuneTier::Poor,
        }
    }

    /// Theme color rendered on the card
    pub fn theme_color(&self) -> &'static str {
        match self {
            FortuneTier::Excellent => "#10b981",
            FortuneTier::Good => "#3b82f6",
            FortuneTier::Fair => "#f59e0b",
            FortuneTier::Poor => "#ef4444",
        }
    }

    pub fn color_name(&self) -> &'static str {
        match self {
            FortuneTier::Excellent => "green",
            FortuneTier::Good => "blue",
            FortuneTier::Fair => "orange",
            FortuneTier::Poor => "red",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_score_maps_to_threshold_color() {
        for score in 0..=100u8 {
            let expected = if score >= 80 {
                "#10b981"
            } else if score >= 60 {
                "#3b82f6"
            } else if score >= 40 {
                "#f59e0b"
            } else {
                "#ef4444"
            };
            assert_eq!(FortuneTier::from_score(score).theme_color(), expected, "score {score}");
        }
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(FortuneTier::from_score(80), FortuneTier::Excellent);
        assert_eq!(FortuneTier::from_score(79), FortuneTier::Good);
        assert_eq!(FortuneTier::from_score(40), FortuneTier::Fair);
        assert_eq!(FortuneTier::from_score(39), FortuneTier::Poor);
    }
}
