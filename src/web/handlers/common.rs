//! Handlers shared by every route.

use axum::http::StatusCode;

use crate::web::error::ApiError;

/// Answer a CORS preflight. The CORS middleware supplies the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unregistered routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}
