//! Calendar - Zodiac sign, zodiac animal and a simplified BaZi
//!
//! The BaZi here is a deliberate approximation: the year boundary is fixed at
//! Feb 4, month branches follow the Gregorian month, and the day pillar uses
//! an average month length of 30.44 days. It ignores solar terms and the
//! lunisolar calendar and must stay bit-for-bit stable, so do not "correct" it.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::{EarthlyBranch, BRANCH_CHARS};

/// Heavenly stems indexed 0 = 甲
pub const STEM_CHARS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

/// Zodiac animals indexed 0 = 鼠
pub const ZODIAC_ANIMALS: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];

const REFERENCE_YEAR: i32 = 1900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Year-agnostic lookup on (month, day)
    pub fn from_date(date: NaiveDate) -> Self {
        use ZodiacSign::*;

        match (date.month(), date.day()) {
            (3, 21..=31) | (4, 1..=19) => Aries,
            (4, _) | (5, 1..=20) => Taurus,
            (5, _) | (6, 1..=21) => Gemini,
            (6, _) | (7, 1..=22) => Cancer,
            (7, _) | (8, 1..=22) => Leo,
            (8, _) | (9, 1..=22) => Virgo,
            (9, _) | (10, 1..=23) => Libra,
            (10, _) | (11, 1..=22) => Scorpio,
            (11, _) | (12, 1..=21) => Sagittarius,
            (12, _) | (1, 1..=19) => Capricorn,
            (1, _) | (2, 1..=18) => Aquarius,
            _ => Pisces,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "白羊座",
            ZodiacSign::Taurus => "金牛座",
            ZodiacSign::Gemini => "双子座",
            ZodiacSign::Cancer => "巨蟹座",
            ZodiacSign::Leo => "狮子座",
            ZodiacSign::Virgo => "处女座",
            ZodiacSign::Libra => "天秤座",
            ZodiacSign::Scorpio => "天蝎座",
            ZodiacSign::Sagittarius => "射手座",
            ZodiacSign::Capricorn => "摩羯座",
            ZodiacSign::Aquarius => "水瓶座",
            ZodiacSign::Pisces => "双鱼座",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈",
            ZodiacSign::Taurus => "♉",
            ZodiacSign::Gemini => "♊",
            ZodiacSign::Cancer => "♋",
            ZodiacSign::Leo => "♌",
            ZodiacSign::Virgo => "♍",
            ZodiacSign::Libra => "♎",
            ZodiacSign::Scorpio => "♏",
            ZodiacSign::Sagittarius => "♐",
            ZodiacSign::Capricorn => "♑",
            ZodiacSign::Aquarius => "♒",
            ZodiacSign::Pisces => "♓",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

/// Animal of the Chinese zodiac for a Gregorian year, `(year - 4) mod 12`
pub fn zodiac_animal(year: i32) -> &'static str {
    ZODIAC_ANIMALS[(year - 4).rem_euclid(12) as usize]
}

/// One stem/branch pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pillar {
    pub stem: usize,
    pub branch: usize,
}

impl Pillar {
    fn from_offset(offset: i64) -> Self {
        Self {
            stem: offset.rem_euclid(10) as usize,
            branch: offset.rem_euclid(12) as usize,
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", STEM_CHARS[self.stem], BRANCH_CHARS[self.branch])
    }
}

/// Four pillars: year, month, day, hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaZi {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl BaZi {
    pub fn compute(date: NaiveDate, hour: EarthlyBranch) -> Self {
        let (year, month, day) = (date.year(), date.month(), date.day());

        let mut year_offset = (year - REFERENCE_YEAR) as i64;
        if month < 2 || (month == 2 && day < 4) {
            year_offset -= 1;
        }
        let year_pillar = Pillar::from_offset(year_offset);

        let month_branch = (month % 12) as usize;
        let month_pillar = Pillar {
            stem: (year_pillar.stem * 2 + month_branch) % 10,
            branch: month_branch,
        };

        let day_offset = ((year - REFERENCE_YEAR) as f64 * 365.25
            + (month - 1) as f64 * 30.44
            + day as f64)
            .floor() as i64;
        let day_pillar = Pillar::from_offset(day_offset);

        let hour_branch = hour.index();
        let hour_pillar = Pillar {
            stem: (day_pillar.stem * 2 + hour_branch) % 10,
            branch: hour_branch,
        };

        Self {
            year: year_pillar,
            month: month_pillar,
            day: day_pillar,
            hour: hour_pillar,
        }
    }

    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }
}

impl fmt::Display for BaZi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

/// Long zh-CN date, e.g. `2025年1月15日星期三`
pub fn format_chinese_date(date: NaiveDate) -> String {
    let weekday = match date.weekday() {
        Weekday::Mon => "一",
        Weekday::Tue => "二",
        Weekday::Wed => "三",
        Weekday::Thu => "四",
        Weekday::Fri => "五",
        Weekday::Sat => "六",
        Weekday::Sun => "日",
    };
    format!(
        "{}年{}月{}日星期{}",
        date.year(),
        date.month(),
        date.day(),
        weekday
    )
}

/// Everything derivable from a birth date and time block without the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BirthChart {
    pub birth_date: NaiveDate,
    pub birth_time: String,
    pub hour_range: String,
    pub zodiac: String,
    pub zodiac_icon: String,
    pub zodiac_english: String,
    pub zodiac_animal: String,
    pub bazi: String,
    /// Year, month, day and hour pillars in that order
    pub pillars: Vec<String>,
}

impl BirthChart {
    pub fn compute(birth_date: NaiveDate, birth_time: EarthlyBranch) -> Self {
        let sign = ZodiacSign::from_date(birth_date);
        let bazi = BaZi::compute(birth_date, birth_time);

        Self {
            birth_date,
            birth_time: birth_time.as_char().to_string(),
            hour_range: birth_time.hour_range(),
            zodiac: sign.name().to_string(),
            zodiac_icon: sign.icon().to_string(),
            zodiac_english: sign.english_name().to_string(),
            zodiac_animal: zodiac_animal(birth_date.year()).to_string(),
            bazi: bazi.to_string(),
            pillars: bazi.pillars().iter().map(Pillar::to_string).collect(),
        }
    }
}
