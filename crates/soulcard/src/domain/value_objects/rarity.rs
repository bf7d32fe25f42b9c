//! Rarity - Gacha-style rarity tier of a personality card

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rarity tier, from common (N) to ultra rare (UR)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
pub enum Rarity {
    N,
    R,
    SR,
    SSR,
    UR,
}

impl Rarity {
    pub const NAMES: [&'static str; 5] = ["N", "R", "SR", "SSR", "UR"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::N => "N",
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
            Rarity::UR => "UR",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
