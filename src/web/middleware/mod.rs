//! Middleware and extractors for the HTTP surface.

pub mod auth;
pub mod cors;

pub use auth::{bearer_token, Authorized};
pub use cors::{cors_headers, CorsHeaders};
