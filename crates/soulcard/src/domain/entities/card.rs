//! Card - Summarized note rendered as a shareable card

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::ColorTheme;

/// Number of tags every note card carries
pub const CARD_TAG_COUNT: usize = 3;

/// A note condensed into a title, a summary and three tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub color_theme: ColorTheme,
    /// `#RGB` or `#RRGGBB`
    #[schema(example = "#8B5CF6")]
    pub border_color: String,
}
