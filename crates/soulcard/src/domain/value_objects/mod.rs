//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod color_theme;
mod earthly_branch;
mod emotion_type;
mod fortune_tier;
mod modes;
mod rarity;

pub use color_theme::*;
pub use earthly_branch::*;
pub use emotion_type::*;
pub use fortune_tier::*;
pub use modes::*;
pub use rarity::*;
