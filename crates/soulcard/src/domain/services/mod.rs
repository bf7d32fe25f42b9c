//! Domain Services
//!
//! Deterministic calculations used by the daily fortune: calendar lookups
//! and the seeded score generator.

pub mod calendar;
pub mod score;

pub use calendar::{format_chinese_date, zodiac_animal, BaZi, BirthChart, Pillar, ZodiacSign};
pub use score::{birth_timestamp_ms, score, stars, FortuneBaseline, StarCategory};
