//! Fortune Routes - daily fortune and the local birth chart

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use soulcard::{BirthChart, DailyFortune};

use crate::error::{ApiError, ErrorResponse};
use crate::models::{CalendarQuery, DailyFortuneBody};
use crate::AppState;

/// Daily fortune for a person on a date
#[utoipa::path(
    post,
    path = "/api/daily-fortune",
    request_body = DailyFortuneBody,
    responses(
        (status = 200, description = "Daily fortune", body = DailyFortune),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "Model call or output failed", body = ErrorResponse)
    ),
    tag = "Fortune"
)]
pub async fn create_daily_fortune(
    State(state): State<AppState>,
    payload: Result<Json<DailyFortuneBody>, JsonRejection>,
) -> Result<Json<DailyFortune>, ApiError> {
    let Json(payload) = payload?;
    let request = payload.into_request()?;
    let fortune = state.daily_fortune.generate(request).await?;
    Ok(Json(fortune))
}

/// Zodiac sign, animal and BaZi for a birth date and hour. No model call.
#[utoipa::path(
    get,
    path = "/api/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Birth chart", body = BirthChart),
        (status = 400, description = "Invalid date or hour branch", body = ErrorResponse)
    ),
    tag = "Fortune"
)]
pub async fn get_calendar(
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Result<Json<BirthChart>, ApiError> {
    let Query(query) = query?;
    let branch = query.branch()?;
    Ok(Json(BirthChart::compute(query.birth_date, branch)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/daily-fortune", post(create_daily_fortune))
        .route("/api/calendar", get(get_calendar))
}
