//! Free-space admission hint for the upload directory.
//!
//! The check is advisory: nothing is reserved, so an upload that follows an
//! `ok` status can still run out of space.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sysinfo::Disks;
use tracing::{debug, warn};

use crate::{MediadropError, Result};

/// Source of free-space figures for a filesystem path.
pub trait SpaceProbe: Send + Sync {
    /// Bytes available to unprivileged writers on the filesystem holding `path`.
    fn available_space(&self, path: &Path) -> Result<u64>;
}

/// Probe backed by the operating system's disk list.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpaceProbe;

impl SpaceProbe for SystemSpaceProbe {
    fn available_space(&self, path: &Path) -> Result<u64> {
        let resolved = existing_ancestor(path)?;
        let disks = Disks::new_with_refreshed_list();

        disks
            .iter()
            .filter(|disk| resolved.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| disk.available_space())
            .ok_or_else(|| {
                MediadropError::Disk(format!(
                    "no mounted filesystem found for {}",
                    resolved.display()
                ))
            })
    }
}

/// Canonicalize `path`, walking up to the nearest ancestor that exists.
///
/// The upload directory is created lazily, so it may be missing when the
/// disk status is first polled.
fn existing_ancestor(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut candidate = absolute.as_path();
    loop {
        match candidate.canonicalize() {
            Ok(resolved) => return Ok(resolved),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                candidate = candidate.parent().ok_or_else(|| {
                    MediadropError::Disk(format!("no existing ancestor for {}", path.display()))
                })?;
            }
            Err(e) => {
                return Err(MediadropError::Disk(format!(
                    "cannot resolve {}: {e}",
                    candidate.display()
                )))
            }
        }
    }
}

/// Outcome of a disk check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskStatus {
    /// Enough free space for uploads.
    Ok,
    /// Free space is below the configured threshold.
    Busy,
}

/// Compares free space on the upload filesystem against a threshold.
pub struct DiskGate {
    path: PathBuf,
    min_free_bytes: u64,
    probe: Box<dyn SpaceProbe>,
}

impl std::fmt::Debug for DiskGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskGate")
            .field("path", &self.path)
            .field("min_free_bytes", &self.min_free_bytes)
            .finish_non_exhaustive()
    }
}

impl DiskGate {
    /// Create a gate using the system probe.
    pub fn new(path: impl Into<PathBuf>, min_free_bytes: u64) -> Self {
        Self::with_probe(path, min_free_bytes, SystemSpaceProbe)
    }

    /// Create a gate with a custom probe.
    pub fn with_probe(
        path: impl Into<PathBuf>,
        min_free_bytes: u64,
        probe: impl SpaceProbe + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            min_free_bytes,
            probe: Box::new(probe),
        }
    }

    /// Threshold below which the gate reports busy.
    pub fn min_free_bytes(&self) -> u64 {
        self.min_free_bytes
    }

    /// Query free space and classify it. Blocking; call off the async runtime.
    pub fn check(&self) -> Result<DiskStatus> {
        let available = self.probe.available_space(&self.path).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Disk space query failed");
            e
        })?;

        let status = if available < self.min_free_bytes {
            DiskStatus::Busy
        } else {
            DiskStatus::Ok
        };

        debug!(
            available_bytes = available,
            min_free_bytes = self.min_free_bytes,
            ?status,
            "Disk space checked"
        );

        Ok(status)
    }
}
