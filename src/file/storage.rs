//! Physical storage for uploaded files.
//!
//! Files are written flat into the upload directory as
//! `{32 hex chars}_{original name}`:
//! ```text
//! uploads/
//! ├── 3f9c0e1a2b4d5e6f708192a3b4c5d6e7_cat.jpg
//! └── a0b1c2d3e4f5061728394a5b6c7d8e9f_clip.mp4
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::token::generate_token;
use crate::Result;

/// Attempts at finding an unused stored name before giving up.
pub const MAX_NAME_ATTEMPTS: usize = 3;

/// Source of random stored-name prefixes.
pub type PrefixSource = fn() -> Result<String>;

/// Upload directory manager.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
    prefix: PrefixSource,
}

impl UploadStorage {
    /// Create a storage rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: generate_token,
        }
    }

    /// Replace the stored-name prefix source.
    pub fn with_prefix_source(mut self, prefix: PrefixSource) -> Self {
        self.prefix = prefix;
        self
    }

    /// Get the upload directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory and any missing parents.
    pub async fn ensure_dir(&self) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o777);
        builder.create(&self.dir).await?;
        Ok(())
    }

    /// Build a fresh stored name for an original filename.
    pub fn stored_name(&self, original_name: &str) -> Result<String> {
        Ok(format!("{}_{}", (self.prefix)()?, original_name))
    }

    /// Full path of a stored file.
    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }

    /// Open a new destination file for `original_name`.
    ///
    /// Existing files are never overwritten: on a name clash a new random
    /// prefix is drawn, up to [`MAX_NAME_ATTEMPTS`] times.
    pub async fn create(&self, original_name: &str) -> Result<PartialUpload> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let stored_name = self.stored_name(original_name)?;
            let path = self.path_for(&stored_name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok(PartialUpload::new(file, path, stored_name)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    warn!(attempt, stored_name = %stored_name, "Stored name already taken");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free stored name after {MAX_NAME_ATTEMPTS} attempts"),
        )
        .into())
    }
}

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name of the file inside the upload directory.
    pub stored_name: String,
    /// Full path on disk.
    pub path: PathBuf,
    /// Number of bytes written.
    pub size: u64,
}

/// Destination file being filled with an upload.
///
/// Unless [`PartialUpload::commit`] succeeds, the file is deleted when this
/// value is dropped: a failed write or a dropped request future leaves no
/// partial file behind.
#[derive(Debug)]
pub struct PartialUpload {
    file: Option<File>,
    path: PathBuf,
    stored_name: String,
    written: u64,
    committed: bool,
}

impl PartialUpload {
    fn new(file: File, path: PathBuf, stored_name: String) -> Self {
        Self {
            file: Some(file),
            path,
            stored_name,
            written: 0,
            committed: false,
        }
    }

    /// Name of the file inside the upload directory.
    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Append a chunk of the payload.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let file = self.file.as_mut().ok_or_else(closed_error)?;
        file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush the payload to disk and keep the file.
    pub async fn commit(mut self) -> Result<StoredFile> {
        let mut file = self.file.take().ok_or_else(closed_error)?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        self.committed = true;
        Ok(StoredFile {
            stored_name: std::mem::take(&mut self.stored_name),
            path: self.path.clone(),
            size: self.written,
        })
    }
}

fn closed_error() -> crate::MediadropError {
    io::Error::new(io::ErrorKind::Other, "upload file already closed").into()
}

impl Drop for PartialUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.file.take());
        // Removed inline: the file is gone before the error response is sent.
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed incomplete upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove incomplete upload"
            ),
        }
    }
}
