//! Bearer token authentication.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Message for a missing or malformed `Authorization` header.
pub const MISSING_AUTHORIZATION: &str = "Unauthorized";

/// Message for a bearer token the registry does not know.
pub const INVALID_TOKEN: &str = "Invalid token";

/// Extract the raw bearer token from request headers.
///
/// Returns `None` unless the header is present, is valid UTF-8 and starts
/// with `Bearer `. The remainder may be empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Extractor for requests carrying an issued bearer token.
///
/// Rejects with 401 before the request body is touched. The token stays
/// valid after use.
#[derive(Debug, Clone)]
pub struct Authorized(pub String);

impl FromRequestParts<Arc<AppState>> for Authorized {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = bearer_token(&parts.headers)
                .ok_or_else(|| ApiError::unauthorized(MISSING_AUTHORIZATION))?;

            if !state.tokens.is_valid(token) {
                tracing::debug!("Rejected unknown bearer token");
                return Err(ApiError::unauthorized(INVALID_TOKEN));
            }

            Ok(Authorized(token.to_string()))
        })
    }
}
