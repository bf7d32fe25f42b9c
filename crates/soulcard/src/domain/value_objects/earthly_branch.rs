//! EarthlyBranch - The twelve two-hour birth-time blocks (时辰)

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the twelve earthly branches, used here to name a two-hour time block.
///
/// Serialized as the single branch character (`"子"`). Parsing also accepts
/// `"子时"` and the pinyin name (`"zi"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EarthlyBranch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// Branch characters indexed 0 = 子
pub const BRANCH_CHARS: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

const PINYIN: [&str; 12] = [
    "zi", "chou", "yin", "mao", "chen", "si", "wu", "wei", "shen", "you", "xu", "hai",
];

impl EarthlyBranch {
    pub const ALL: [EarthlyBranch; 12] = [
        EarthlyBranch::Zi,
        EarthlyBranch::Chou,
        EarthlyBranch::Yin,
        EarthlyBranch::Mao,
        EarthlyBranch::Chen,
        EarthlyBranch::Si,
        EarthlyBranch::Wu,
        EarthlyBranch::Wei,
        EarthlyBranch::Shen,
        EarthlyBranch::You,
        EarthlyBranch::Xu,
        EarthlyBranch::Hai,
    ];

    /// Position in the cycle, 子 = 0
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn as_char(&self) -> &'static str {
        BRANCH_CHARS[self.index()]
    }

    /// Clock span of the block. 子 wraps midnight (23:00-01:00).
    pub fn hour_range(&self) -> String {
        let start = (23 + 2 * self.index()) % 24;
        let end = (start + 2) % 24;
        format!("{:02}:00-{:02}:00", start, end)
    }
}

impl std::fmt::Display for EarthlyBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_char())
    }
}

impl std::str::FromStr for EarthlyBranch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_suffix('时').unwrap_or(trimmed);
        let lower = name.to_lowercase();

        BRANCH_CHARS
            .iter()
            .position(|c| *c == name)
            .or_else(|| PINYIN.iter().position(|p| *p == lower))
            .map(Self::from_index)
            .ok_or_else(|| format!("Unknown birth time block: {}", s))
    }
}

impl Serialize for EarthlyBranch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_char())
    }
}

impl<'de> Deserialize<'de> for EarthlyBranch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
