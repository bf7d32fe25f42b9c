//! Domain Entities
//!
//! Typed results handed back to the presentation layer.
//! - Card: summarized note
//! - Diagnosis: mood analysis
//! - PersonalityCard: chat-derived profile
//! - FortuneCard: emotion-linked mini fortune
//! - DailyFortune: date-scoped astrological report
//! - Transcript: personality chat history

mod card;
mod conversation;
mod daily_fortune;
mod diagnosis;
mod fortune_card;
mod personality;

pub use card::*;
pub use conversation::*;
pub use daily_fortune::*;
pub use diagnosis::*;
pub use fortune_card::*;
pub use personality::*;
