//! PersonalityCard - Profile derived from the chat transcript

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::Rarity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityCard {
    pub title: String,
    pub rarity: Rarity,
    pub analysis: PersonalityAnalysis,
    pub stats: PersonalityStats,
    pub visual: CardVisual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityAnalysis {
    /// The verdict paragraph
    pub comment: String,
    pub hobbies: Vec<String>,
    /// Which kind of person gets along with this one
    pub compatible: String,
}

/// Six dimensions, each in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonalityStats {
    pub introversion: u8,
    pub creativity: u8,
    pub humor: u8,
    pub logic: u8,
    pub empathy: u8,
    pub energy: u8,
}

impl PersonalityStats {
    pub const DIMENSIONS: [&'static str; 6] = [
        "introversion",
        "creativity",
        "humor",
        "logic",
        "empathy",
        "energy",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardVisual {
    pub bg_color: String,
    pub primary_color: String,
    pub secondary_color: String,
}
