//! Seeded fortune score and star ratings
//!
//! Pure functions that must give identical results on every platform and in
//! every reimplementation. Lengths and character codes are UTF-16 code units
//! and the hash uses 32-bit signed wraparound arithmetic.

use chrono::NaiveDate;

/// Star rating dimensions of the daily fortune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarCategory {
    Love,
    Career,
    Wealth,
}

impl StarCategory {
    pub const ALL: [StarCategory; 3] = [StarCategory::Love, StarCategory::Career, StarCategory::Wealth];

    /// Label mixed into the seed
    pub fn label(&self) -> &'static str {
        match self {
            StarCategory::Love => "爱情",
            StarCategory::Career => "事业",
            StarCategory::Wealth => "财运",
        }
    }
}

/// `hash = hash * 31 + code_unit` over UTF-16, wrapped to i32
fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

fn utf16_len(s: &str) -> i64 {
    s.encode_utf16().count() as i64
}

fn base_seed(subject: &str, birth_timestamp_ms: i64, target_date: &str) -> i64 {
    // `%` truncates toward zero, so pre-1970 births give a negative term
    utf16_len(subject) * 1000 + birth_timestamp_ms % 10_000 + utf16_len(target_date) * 100
}

fn seed_hash(seed: i64) -> i64 {
    (string_hash(&seed.to_string()) as i64).abs()
}

/// Overall fortune score in `0..=100`
pub fn score(subject: &str, birth_timestamp_ms: i64, target_date: &str) -> u8 {
    (seed_hash(base_seed(subject, birth_timestamp_ms, target_date)) % 101) as u8
}

/// Star rating in `1..=5` for a category label
pub fn stars(subject: &str, birth_timestamp_ms: i64, target_date: &str, category: &str) -> u8 {
    let category_sum: i64 = category.encode_utf16().map(i64::from).sum();
    let seed = base_seed(subject, birth_timestamp_ms, target_date) + category_sum * 50;

    match seed_hash(seed) % 100 {
        80.. => 5,
        60.. => 4,
        40.. => 3,
        20.. => 2,
        _ => 1,
    }
}

/// Birth date at 00:00 UTC in milliseconds since the epoch
pub fn birth_timestamp_ms(birth_date: NaiveDate) -> i64 {
    birth_date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// Locally computed calibration anchor for one report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FortuneBaseline {
    pub score: u8,
    pub love_stars: u8,
    pub career_stars: u8,
    pub wealth_stars: u8,
}

impl FortuneBaseline {
    /// `target_date` is the ISO `YYYY-MM-DD` form of the report date
    pub fn compute(subject: &str, birth_date: NaiveDate, target_date: NaiveDate) -> Self {
        let birth_ms = birth_timestamp_ms(birth_date);
        let iso = target_date.format("%Y-%m-%d").to_string();
        let star = |c: StarCategory| stars(subject, birth_ms, &iso, c.label());

        Self {
            score: score(subject, birth_ms, &iso),
            love_stars: star(StarCategory::Love),
            career_stars: star(StarCategory::Career),
            wealth_stars: star(StarCategory::Wealth),
        }
    }
}
