//! ColorTheme - Card accent palette

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Accent palette of a note card, picked by the model from the note's tone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Calm / professional
    Blue,
    /// Positive / growth
    Green,
    /// Important / urgent
    Red,
    /// Creative / inspired
    Purple,
    /// Reminder / caution
    Yellow,
}

impl ColorTheme {
    /// Wire names accepted by the validator
    pub const NAMES: [&'static str; 5] = ["blue", "green", "red", "purple", "yellow"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Blue => "blue",
            ColorTheme::Green => "green",
            ColorTheme::Red => "red",
            ColorTheme::Purple => "purple",
            ColorTheme::Yellow => "yellow",
        }
    }
}

impl std::fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColorTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(ColorTheme::Blue),
            "green" => Ok(ColorTheme::Green),
            "red" => Ok(ColorTheme::Red),
            "purple" => Ok(ColorTheme::Purple),
            "yellow" => Ok(ColorTheme::Yellow),
            _ => Err(format!("Unknown color theme: {}", s)),
        }
    }
}
