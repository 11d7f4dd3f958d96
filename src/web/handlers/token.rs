//! Token issuance handler.

use axum::extract::State;
use std::sync::Arc;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::MediadropError;

const ISSUE_FAILED: &str = "Token üretilemedi";

/// POST /token - Issue a new bearer token.
///
/// The response body is the 32-character hex token. It is registered before
/// the response is produced, so it is immediately usable.
pub async fn issue_token(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    state.tokens.issue().map_err(issue_failed)
}

fn issue_failed(e: MediadropError) -> ApiError {
    tracing::error!(error = %e, "Failed to generate token");
    ApiError::internal(ISSUE_FAILED)
}
