//! Personality Routes - persona chat and the personality card
//!
//! The server keeps no session: the client posts the transcript on every call.

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use soulcard::PersonalityCard;

use crate::error::{ApiError, ErrorResponse};
use crate::models::{
    transcript_from, ChatRequest, ChatResponse, ReportRequest, TurnRequest, TurnResponse,
};
use crate::AppState;

/// One persona reply to a transcript ending with a user turn
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Persona reply", body = ChatResponse),
        (status = 400, description = "Malformed transcript", body = ErrorResponse),
        (status = 502, description = "Model call failed", body = ErrorResponse)
    ),
    tag = "Personality"
)]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let transcript = transcript_from(payload.messages)?;
    let reply = state
        .personality
        .reply(&transcript, payload.mode.unwrap_or_default())
        .await?;
    Ok(Json(ChatResponse { reply }))
}

/// Append a user message, fetch the reply, and build the card after the fifth reply
#[utoipa::path(
    post,
    path = "/api/personality/turn",
    request_body = TurnRequest,
    responses(
        (status = 200, description = "Updated transcript and reply", body = TurnResponse),
        (status = 400, description = "Malformed transcript or sixth user turn", body = ErrorResponse),
        (status = 502, description = "Model call failed", body = ErrorResponse)
    ),
    tag = "Personality"
)]
pub async fn submit_turn(
    State(state): State<AppState>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let Json(payload) = payload?;
    let mut transcript = transcript_from(payload.messages)?;
    let outcome = state
        .personality
        .submit_turn(
            &mut transcript,
            &payload.message,
            payload.mode.unwrap_or_default(),
        )
        .await?;

    let (profile, profile_error) = match outcome.profile {
        Some(Ok(card)) => (Some(card), None),
        Some(Err(e)) => (None, Some(ErrorResponse::from(&e))),
        None => (None, None),
    };

    Ok(Json(TurnResponse {
        messages: transcript.into_turns(),
        reply: outcome.reply,
        profile,
        profile_error,
    }))
}

/// Build the personality card from the turns so far
#[utoipa::path(
    post,
    path = "/api/personality/report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Personality card", body = PersonalityCard),
        (status = 400, description = "No user turn yet", body = ErrorResponse),
        (status = 502, description = "Model call or output failed", body = ErrorResponse)
    ),
    tag = "Personality"
)]
pub async fn report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<PersonalityCard>, ApiError> {
    let Json(payload) = payload?;
    let transcript = transcript_from(payload.messages)?;
    let card = state
        .personality
        .generate_profile(&transcript, payload.mode.unwrap_or_default())
        .await?;
    Ok(Json(card))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/personality/turn", post(submit_turn))
        .route("/api/personality/report", post(report))
}
