//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use soulcard::{
    BirthChart, Card, CardVisual, ChatMode, ColorTheme, ConversationTurn, DailyFortune,
    Diagnosis, DiagnosisMode, EmotionType, ErrorKind, FortuneBreakdown, FortuneCard,
    PersonalityAnalysis, PersonalityCard, PersonalityStats, Rarity, TurnRole,
};

use crate::error::ErrorResponse;
use crate::models::{
    CardRequest, ChatRequest, ChatResponse, DailyFortuneBody, DiagnosisRequest,
    FortuneCardRequest, ReportRequest, TurnRequest, TurnResponse,
};

use super::health::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health::health_check,
        // Card endpoints
        super::card::create_card,
        super::card::create_diagnosis,
        super::card::create_fortune_card,
        // Fortune endpoints
        super::fortune::create_daily_fortune,
        super::fortune::get_calendar,
        // Personality endpoints
        super::personality::chat,
        super::personality::submit_turn,
        super::personality::report,
    ),
    components(
        schemas(
            HealthCheck,
            ErrorResponse,
            ErrorKind,
            // Card models
            CardRequest,
            Card,
            ColorTheme,
            DiagnosisRequest,
            DiagnosisMode,
            Diagnosis,
            EmotionType,
            FortuneCardRequest,
            FortuneCard,
            FortuneBreakdown,
            // Fortune models
            DailyFortuneBody,
            DailyFortune,
            BirthChart,
            // Personality models
            ChatMode,
            TurnRole,
            ConversationTurn,
            ChatRequest,
            ChatResponse,
            TurnRequest,
            TurnResponse,
            ReportRequest,
            PersonalityCard,
            PersonalityAnalysis,
            PersonalityStats,
            CardVisual,
            Rarity,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Card", description = "Note card, mood diagnosis and fortune card"),
        (name = "Fortune", description = "Daily fortune and birth chart"),
        (name = "Personality", description = "Persona chat and personality card"),
    ),
    info(
        title = "Soulcard API",
        description = "Turns text and conversations into shareable cards",
    )
)]
pub struct ApiDoc;
