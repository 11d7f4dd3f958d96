//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    disk_status, health_check, issue_token, not_found, preflight, upload_file, AppState,
};
use super::middleware::{cors_headers, CorsHeaders};

/// Create the API router.
///
/// Every route answers `OPTIONS` with an empty 200 before any business
/// logic runs, and every response, including the 404 fallback, carries the
/// CORS headers.
pub fn create_router(app_state: Arc<AppState>, cors: CorsHeaders) -> Router {
    let upload_limit = usize::try_from(app_state.max_upload_size).unwrap_or(usize::MAX);

    Router::new()
        .route("/token", post(issue_token).options(preflight))
        .route("/disk", get(disk_status).options(preflight))
        .route(
            "/upload",
            post(upload_file)
                .options(preflight)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .merge(create_health_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(cors, cors_headers)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}
