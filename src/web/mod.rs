//! HTTP API module for mediadrop.
//!
//! Exposes token issuance, the disk status hint and token-guarded uploads.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
