//! HTTP mapping of feature errors

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use soulcard::{ErrorKind, FeatureError};
use utoipa::ToSchema;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&FeatureError> for ErrorResponse {
    fn from(e: &FeatureError) -> Self {
        Self {
            error: e.message.clone(),
            kind: e.kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Feature(e) => e.kind,
            ApiError::BadRequest(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Config => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Cancelled => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::Upstream
            | ErrorKind::Network
            | ErrorKind::Parse
            | ErrorKind::Validation
            | ErrorKind::MalformedResponse
            | ErrorKind::Unauthorized
            | ErrorKind::InsufficientBalance
            | ErrorKind::NotFound => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("请求体格式错误: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("查询参数错误: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        if status.is_server_error() {
            tracing::warn!(%status, kind = kind.as_str(), "request failed: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(kind: ErrorKind) -> StatusCode {
        ApiError::from(FeatureError::new(kind, "x")).status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(ErrorKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ErrorKind::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_of(ErrorKind::Config), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(ErrorKind::Timeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status_of(ErrorKind::Cancelled), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(status_of(ErrorKind::Unauthorized), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(ErrorKind::Validation), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(ErrorKind::InsufficientBalance), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_bad_request_is_invalid_input() {
        let err = ApiError::BadRequest("nope".into());
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
