//! mediadrop - token-guarded intake for image and video uploads.
//!
//! Clients obtain an opaque bearer token, may poll a free-space hint and
//! then upload media files that are stored under collision-safe names.

pub mod config;
pub mod disk;
pub mod error;
pub mod file;
pub mod logging;
pub mod token;
pub mod web;

pub use config::Config;
pub use disk::{DiskGate, DiskStatus, SpaceProbe, SystemSpaceProbe};
pub use error::{MediadropError, Result};
pub use file::{is_media_file, sanitize_filename, StoredFile, UploadStorage};
pub use token::{generate_token, TokenRegistry};
pub use web::{create_router, AppState, WebServer};
