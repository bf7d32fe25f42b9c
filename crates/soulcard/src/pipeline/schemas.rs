//! Structural schemas of the five result types

use crate::domain::entities::{
    Card, DailyFortune, Diagnosis, FortuneCard, PersonalityCard, PersonalityStats, CARD_TAG_COUNT,
};
use crate::domain::errors::ValidationErrors;
use crate::domain::value_objects::{ColorTheme, EmotionType, Rarity};
use crate::pipeline::validator::{ObjectCheck, Schema, SchemaKind};

const PERCENT: std::ops::RangeInclusive<i64> = 0..=100;
const STARS: std::ops::RangeInclusive<i64> = 1..=5;

impl Schema for Card {
    const KIND: SchemaKind = SchemaKind::Card;

    fn check(o: &ObjectCheck<'_>, errors: &mut ValidationErrors) {
        o.text("title", errors);
        o.text("summary", errors);
        o.string_array("tags", CARD_TAG_COUNT, Some(CARD_TAG_COUNT), errors);
        o.one_of("colorTheme", &ColorTheme::NAMES, errors);
        o.hex_color("borderColor", errors);
    }
}

/// Emotion fields shared by Diagnosis and FortuneCard
fn check_emotion_fields(o: &ObjectCheck<'_>, errors: &mut ValidationErrors) {
    o.one_of("emotionType", &EmotionType::NAMES, errors);
    o.text("title", errors);
    o.text("analysis", errors);
    o.string_array("tags", 2, Some(5), errors);
    o.hex_color("emotionColor", errors);
    o.string_array("suggestions", 1, Some(3), errors);
    o.integer("intensity", PERCENT, errors);
}

impl Schema for Diagnosis {
    const KIND: SchemaKind = SchemaKind::Diagnosis;

    fn check(o: &ObjectCheck<'_>, errors: &mut ValidationErrors) {
        check_emotion_fields(o, errors);
    }
}

impl Schema for FortuneCard {
    const KIND: SchemaKind = SchemaKind::FortuneCard;

    fn check(o: &ObjectCheck<'_>, errors: &mut ValidationErrors) {
        o.text("date", errors);
        check_emotion_fields(o, errors);
        if let Some(fortune) = o.object("fortune", errors) {
            for part in ["overall", "love", "career", "health"] {
                fortune.text(part, errors);
            }
        }
    }
}

impl Schema for PersonalityCard {
    const KIND: SchemaKind = SchemaKind::PersonalityCard;

    fn check(o: &ObjectCheck<'_>, errors: &mut ValidationErrors) {
        o.text("title", errors);
        o.one_of("rarity", &Rarity::NAMES, errors);

        if let Some(analysis) = o.object("analysis", errors) {
            analysis.text("comment", errors);
            analysis.string_array("hobbies", 1, None, errors);
            analysis.text("compatible", errors);
        }
        if let Some(stats) = o.object("stats", errors) {
            for dimension in PersonalityStats::DIMENSIONS {
                stats.integer(dimension, PERCENT, errors);
            }
        }
        if let Some(visual) = o.object("visual", errors) {
            for color in ["bgColor", "primaryColor", "secondaryColor"] {
                visual.hex_color(color, errors);
            }
        }
    }
}

impl Schema for DailyFortune {
    const KIND: SchemaKind = SchemaKind::DailyFortune;

    fn check(o: &ObjectCheck<'_>, errors: &mut ValidationErrors) {
        for field in ["date", "zodiac", "zodiacIcon"] {
            o.text(field, errors);
        }
        o.integer("overallScore", PERCENT, errors);
        for field in ["loveStars", "careerStars", "wealthStars"] {
            o.integer(field, STARS, errors);
        }
        o.string_array("keywords", 1, Some(3), errors);
        o.text("luckyItem", errors);
        o.text("luckyColor", errors);
        o.hex_color("luckyColorHex", errors);
        o.string_array("shouldDo", 1, Some(3), errors);
        o.string_array("shouldNotDo", 1, Some(3), errors);
        for field in [
            "zodiacFortune",
            "zodiacAnimalFortune",
            "loveFortune",
            "careerFortune",
            "wealthFortune",
        ] {
            o.text(field, errors);
        }
        o.hex_color("themeColor", errors);
        for field in ["birthTime", "bazi", "name"] {
            o.optional_string(field, errors);
        }
    }
}
