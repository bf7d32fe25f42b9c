//! Soulcard Domain Library
//!
//! Turns user text into validated, shareable cards by way of a chat
//! completion model, plus the deterministic calendar behind the daily
//! fortune.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure entities and logic
//!   - `entities/`: Card, Diagnosis, PersonalityCard, FortuneCard, DailyFortune, Transcript
//!   - `value_objects/`: Closed enums (ColorTheme, EmotionType, Rarity, modes, EarthlyBranch)
//!   - `services/`: Calendar (zodiac, BaZi) and the seeded score generator
//!   - `errors/`: Transport, pipeline and user-facing error types
//!
//! - **Ports** (`ports/`): The `CompletionProvider` trait
//!
//! - **Services** (`services/`): reqwest implementation of the port
//!
//! - **Pipeline** (`pipeline/`): Fence stripping, JSON parsing, schema
//!   validation and error classification
//!
//! - **Application** (`application/`): One orchestrator per feature
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use soulcard::{ChatCompletionClient, CompletionConfig, NoteCardService};
//!
//! let client = Arc::new(ChatCompletionClient::new(CompletionConfig::from_env()));
//! let card = NoteCardService::new(client).generate("今天开会讨论了新产品路线图").await?;
//! ```

pub mod application;
pub mod domain;
pub mod pipeline;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use application::{
    DailyFortuneRequest, DailyFortuneService, DiagnosisService, FortuneCardService,
    NoteCardService, PersonalityService, TurnOutcome,
};
pub use domain::services::{BaZi, BirthChart, FortuneBaseline, ZodiacSign};
pub use domain::{
    Card, CardVisual, ChatMode, ColorTheme, CompletionError, ConversationTurn, DailyFortune,
    Diagnosis, DiagnosisMode, EarthlyBranch, EmotionType, ErrorKind, Feature, FeatureError,
    FortuneBreakdown, FortuneCard, FortuneTier, PersonalityAnalysis, PersonalityCard,
    PersonalityStats, Rarity, Transcript, TranscriptError, TurnRole, ValidationErrors, Violation,
    REQUIRED_USER_TURNS,
};
pub use pipeline::{SchemaKind, TypedResult};
pub use ports::{ChatMessage, CompletionOptions, CompletionProvider, MessageRole};
pub use services::{ChatCompletionClient, CompletionConfig};
