use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is up", body = HealthCheck)),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Soulcard API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
