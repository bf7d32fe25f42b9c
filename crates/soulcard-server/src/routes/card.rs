//! Card Routes - note card, mood diagnosis and fortune card
//!
//! Each handler delegates to one orchestrator and returns its validated object.

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use chrono::Local;
use soulcard::{Card, Diagnosis, FortuneCard};

use crate::error::{ApiError, ErrorResponse};
use crate::models::{CardRequest, DiagnosisRequest, FortuneCardRequest};
use crate::AppState;

/// Turn free text into a note card
#[utoipa::path(
    post,
    path = "/api/card",
    request_body = CardRequest,
    responses(
        (status = 200, description = "Generated card", body = Card),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Model call or output failed", body = ErrorResponse)
    ),
    tag = "Card"
)]
pub async fn create_card(
    State(state): State<AppState>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Result<Json<Card>, ApiError> {
    let Json(payload) = payload?;
    let card = state.note_card.generate(&payload.text).await?;
    Ok(Json(card))
}

/// Diagnose the mood behind a piece of text
#[utoipa::path(
    post,
    path = "/api/diagnosis",
    request_body = DiagnosisRequest,
    responses(
        (status = 200, description = "Mood diagnosis", body = Diagnosis),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Model call or output failed", body = ErrorResponse)
    ),
    tag = "Card"
)]
pub async fn create_diagnosis(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> Result<Json<Diagnosis>, ApiError> {
    let Json(payload) = payload?;
    let mode = payload.mode.unwrap_or_default();
    let diagnosis = state.diagnosis.diagnose(&payload.text, mode).await?;
    Ok(Json(diagnosis))
}

/// Expand a diagnosis into a dated fortune card
#[utoipa::path(
    post,
    path = "/api/fortune-card",
    request_body = FortuneCardRequest,
    responses(
        (status = 200, description = "Fortune card aligned with the diagnosis", body = FortuneCard),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Model call or output failed", body = ErrorResponse)
    ),
    tag = "Card"
)]
pub async fn create_fortune_card(
    State(state): State<AppState>,
    payload: Result<Json<FortuneCardRequest>, JsonRejection>,
) -> Result<Json<FortuneCard>, ApiError> {
    let Json(payload) = payload?;
    let today = Local::now().date_naive();
    let card = state
        .fortune_card
        .generate(&payload.diagnosis, today)
        .await?;
    Ok(Json(card))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/card", post(create_card))
        .route("/api/diagnosis", post(create_diagnosis))
        .route("/api/fortune-card", post(create_fortune_card))
}
