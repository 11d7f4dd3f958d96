//! Test helpers for HTTP API tests.
//!
//! Provides an in-process test server backed by a temporary upload
//! directory and a fixed free-space probe.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;

use mediadrop::config::GIB;
use mediadrop::disk::{DiskGate, SpaceProbe};
use mediadrop::file::{PrefixSource, UploadStorage};
use mediadrop::token::{TokenRegistry, TOKEN_HEX_LEN};
use mediadrop::web::middleware::CorsHeaders;
use mediadrop::{create_router, AppState, MediadropError};

/// Origin configured for test servers.
pub const TEST_ORIGIN: &str = "https://media.example.com";

/// Minimal JPEG: SOI, APP0/JFIF header, EOI.
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

/// Probe reporting a fixed amount of free space.
pub struct FixedSpace(pub u64);

impl SpaceProbe for FixedSpace {
    fn available_space(&self, _path: &Path) -> mediadrop::Result<u64> {
        Ok(self.0)
    }
}

/// Probe that always fails, as a denied statfs would.
pub struct FailingProbe;

impl SpaceProbe for FailingProbe {
    fn available_space(&self, _path: &Path) -> mediadrop::Result<u64> {
        Err(MediadropError::Disk("permission denied".to_string()))
    }
}

/// A test server plus the state and directory behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub upload_dir: PathBuf,
    _temp_dir: TempDir,
}

/// Builder for [`TestApp`].
pub struct TestAppBuilder {
    probe: Box<dyn FnOnce(&Path) -> DiskGate>,
    max_upload_size: Option<u64>,
    upload_dir: Option<Box<dyn FnOnce(&Path) -> PathBuf>>,
    prefix: Option<PrefixSource>,
    tokens: TokenRegistry,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            probe: Box::new(|dir| DiskGate::with_probe(dir, GIB, FixedSpace(100 * GIB))),
            max_upload_size: None,
            upload_dir: None,
            prefix: None,
            tokens: TokenRegistry::new(),
        }
    }

    /// Report a fixed free-space figure.
    pub fn free_space(mut self, bytes: u64) -> Self {
        self.probe = Box::new(move |dir| DiskGate::with_probe(dir, GIB, FixedSpace(bytes)));
        self
    }

    /// Make every disk query fail.
    pub fn failing_disk(mut self) -> Self {
        self.probe = Box::new(|dir| DiskGate::with_probe(dir, GIB, FailingProbe));
        self
    }

    /// Limit upload request bodies.
    pub fn max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = Some(bytes);
        self
    }

    /// Choose the upload directory relative to the temporary root.
    pub fn upload_dir(mut self, f: impl FnOnce(&Path) -> PathBuf + 'static) -> Self {
        self.upload_dir = Some(Box::new(f));
        self
    }

    /// Draw stored-name prefixes from `prefix`.
    pub fn name_prefix(mut self, prefix: PrefixSource) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Use a specific token registry.
    pub fn tokens(mut self, tokens: TokenRegistry) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn build(self) -> TestApp {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let upload_dir = match self.upload_dir {
            Some(f) => f(temp_dir.path()),
            None => temp_dir.path().join("uploads"),
        };

        let mut storage = UploadStorage::new(&upload_dir);
        if let Some(prefix) = self.prefix {
            storage = storage.with_prefix_source(prefix);
        }

        let mut state = AppState::new(self.tokens, (self.probe)(&upload_dir), storage);
        if let Some(limit) = self.max_upload_size {
            state = state.with_max_upload_size(limit);
        }
        let state = Arc::new(state);

        let cors = CorsHeaders::new(TEST_ORIGIN).expect("Invalid test origin");
        let router = create_router(state.clone(), cors);
        let server = TestServer::new(router).expect("Failed to create test server");

        TestApp {
            server,
            state,
            upload_dir,
            _temp_dir: temp_dir,
        }
    }
}

/// Create a test app with default settings.
pub fn create_test_app() -> TestApp {
    TestAppBuilder::new().build()
}

/// Check that a value looks like an issued token: 32 lowercase hex chars.
pub fn is_token_shaped(value: &str) -> bool {
    value.len() == TOKEN_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Request a token from the API.
pub async fn issue_token(server: &TestServer) -> String {
    let response = server.post("/token").await;
    response.assert_status_ok();
    response.text()
}

/// Build a multipart form with a single `file` part.
pub fn file_form(filename: &str, content: &[u8]) -> MultipartForm {
    let part = Part::bytes(content.to_vec()).file_name(filename);
    MultipartForm::new().add_part("file", part)
}

/// Upload `content` as `filename` with the given bearer token.
pub async fn upload(
    server: &TestServer,
    token: &str,
    filename: &str,
    content: &[u8],
) -> TestResponse {
    server
        .post("/upload")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .multipart(file_form(filename, content))
        .await
}

/// Names of the files currently in the upload directory.
pub fn stored_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}

/// Check the CORS headers on a response.
pub fn assert_cors_headers(response: &TestResponse) {
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        TEST_ORIGIN
    );
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type, Authorization"
    );
}
