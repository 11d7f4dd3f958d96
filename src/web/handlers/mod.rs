//! API handlers.

pub mod common;
pub mod disk;
pub mod token;
pub mod upload;

pub use common::{health_check, not_found, preflight};
pub use disk::{disk_status, DiskStatusResponse};
pub use token::issue_token;
pub use upload::upload_file;

use crate::config::Config;
use crate::disk::DiskGate;
use crate::file::UploadStorage;
use crate::token::TokenRegistry;

/// Application state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    /// Issued bearer tokens.
    pub tokens: TokenRegistry,
    /// Free-space check for the upload filesystem.
    pub disk: DiskGate,
    /// Destination for uploaded files.
    pub storage: UploadStorage,
    /// Request body limit for uploads, in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(tokens: TokenRegistry, disk: DiskGate, storage: UploadStorage) -> Self {
        Self {
            tokens,
            disk,
            storage,
            max_upload_size: crate::config::UploadConfig::default().max_upload_size_bytes,
        }
    }

    /// Build the state described by a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TokenRegistry::from_ttl_secs(config.token.ttl_secs),
            DiskGate::new(&config.upload.dir, config.upload.min_free_bytes),
            UploadStorage::new(&config.upload.dir),
        )
        .with_max_upload_size(config.upload.max_upload_size_bytes)
    }

    /// Set the upload body limit.
    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = bytes;
        self
    }
}
