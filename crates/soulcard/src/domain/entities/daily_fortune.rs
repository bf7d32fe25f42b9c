//! DailyFortune - Date-scoped astrological report
//!
//! The model authors the score and narrative fields. Identity fields are
//! stamped afterwards by [`DailyFortune::finalize`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::{EarthlyBranch, FortuneTier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyFortune {
    pub date: String,
    pub zodiac: String,
    pub zodiac_icon: String,
    /// 0 to 100
    pub overall_score: u8,
    /// 1 to 5
    pub love_stars: u8,
    pub career_stars: u8,
    pub wealth_stars: u8,
    pub keywords: Vec<String>,
    pub lucky_item: String,
    pub lucky_color: String,
    pub lucky_color_hex: String,
    pub should_do: Vec<String>,
    pub should_not_do: Vec<String>,
    pub zodiac_fortune: String,
    pub zodiac_animal_fortune: String,
    pub love_fortune: String,
    pub career_fortune: String,
    pub wealth_fortune: String,
    pub theme_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bazi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Locally known facts about the person and day a report is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneSubject {
    pub name: String,
    pub birth_time: EarthlyBranch,
    pub bazi: String,
    /// Long-form display date of the report
    pub date: String,
    pub zodiac: String,
    pub zodiac_icon: String,
}

impl DailyFortune {
    /// Stamp the locally computed identity fields over whatever the model
    /// produced and derive `theme_color` from `overall_score`.
    pub fn finalize(self, subject: &FortuneSubject) -> Self {
        let tier = FortuneTier::from_score(self.overall_score);
        Self {
            date: subject.date.clone(),
            zodiac: subject.zodiac.clone(),
            zodiac_icon: subject.zodiac_icon.clone(),
            theme_color: tier.theme_color().to_string(),
            birth_time: Some(subject.birth_time.as_char().to_string()),
            bazi: Some(subject.bazi.clone()),
            name: Some(subject.name.clone()),
            ..self
        }
    }

    pub fn tier(&self) -> FortuneTier {
        FortuneTier::from_score(self.overall_score)
    }
}
