//! Configuration module for mediadrop.

use axum::http::HeaderValue;
use serde::Deserialize;
use std::path::Path;

use crate::{MediadropError, Result};

/// One gibibyte in bytes.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8443
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// The single origin allowed to call the API.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_allowed_origin() -> String {
    "yourdomain.com".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
    /// Free space below which the disk status reports busy.
    #[serde(default = "default_min_free")]
    pub min_free_bytes: u64,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    5 * GIB
}

fn default_min_free() -> u64 {
    GIB
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_upload_size_bytes: default_max_upload_size(),
            min_free_bytes: default_min_free(),
        }
    }
}

/// Bearer token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Token lifetime in seconds (0 = valid until the process exits).
    #[serde(default)]
    pub ttl_secs: u64,
    /// Interval between purges of expired tokens, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_cleanup_interval() -> u64 {
    3600
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 0,
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/mediadrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Upload configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Token configuration.
    #[serde(default)]
    pub token: TokenConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(MediadropError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MediadropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `MEDIADROP_CORS_ORIGIN`: Override the allowed CORS origin
    /// - `MEDIADROP_UPLOAD_DIR`: Override the upload directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(origin) = std::env::var("MEDIADROP_CORS_ORIGIN") {
            if !origin.is_empty() {
                self.cors.allowed_origin = origin;
            }
        }
        if let Ok(dir) = std::env::var("MEDIADROP_UPLOAD_DIR") {
            if !dir.is_empty() {
                self.upload.dir = dir;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.upload.max_upload_size_bytes == 0 {
            return Err(MediadropError::Config(
                "upload.max_upload_size_bytes must be greater than zero".to_string(),
            ));
        }
        if HeaderValue::from_str(&self.cors.allowed_origin).is_err() {
            return Err(MediadropError::Config(format!(
                "cors.allowed_origin is not a valid header value: {:?}",
                self.cors.allowed_origin
            )));
        }
        if self.token.ttl_secs > 0 && self.token.cleanup_interval_secs == 0 {
            return Err(MediadropError::Config(
                "token.cleanup_interval_secs must be set when token.ttl_secs is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
