//! Fixed cross-origin headers.

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

use crate::{MediadropError, Result};

/// Methods advertised to browsers.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers advertised to browsers.
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// CORS header values stamped onto every response.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
}

impl CorsHeaders {
    /// Create the header set for a single allowed origin.
    pub fn new(origin: &str) -> Result<Self> {
        let allow_origin = HeaderValue::from_str(origin).map_err(|e| {
            MediadropError::Config(format!("invalid CORS origin {origin:?}: {e}"))
        })?;
        Ok(Self { allow_origin })
    }

    /// Write the CORS headers into a header map, replacing existing values.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }
}

/// CORS middleware.
///
/// Unlike a negotiating CORS layer, the same three headers are added to
/// every response regardless of the request's `Origin`, including 404s,
/// 405s and error responses.
pub async fn cors_headers(State(cors): State<CorsHeaders>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    cors.apply(response.headers_mut());
    response
}
