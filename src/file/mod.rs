//! Upload file handling for mediadrop.
//!
//! This module provides:
//! - Media type gating by file extension
//! - Client filename sanitization
//! - Collision-safe storage of uploaded payloads

mod storage;

pub use storage::{PartialUpload, PrefixSource, StoredFile, UploadStorage, MAX_NAME_ATTEMPTS};

use mime_guess::mime;

use crate::{MediadropError, Result};

/// Extension of the final path segment: everything after its last `.`.
///
/// A leading dot counts, so `.jpg` has the extension `jpg`.
fn extension(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next()?;
    name.rfind('.').map(|dot| &name[dot + 1..])
}

/// Resolve the MIME type of a filename from its lowercased extension.
pub fn mime_for_filename(filename: &str) -> Option<mime::Mime> {
    let ext = extension(filename)?.to_lowercase();
    if ext.is_empty() {
        return None;
    }
    mime_guess::from_ext(&ext).first()
}

/// Check whether a filename names an image or video.
///
/// Unknown extensions and names without an extension are rejected.
pub fn is_media_file(filename: &str) -> bool {
    match mime_for_filename(filename) {
        Some(m) => m.type_() == mime::IMAGE || m.type_() == mime::VIDEO,
        None => false,
    }
}

/// Reduce a client-supplied filename to its final path component.
///
/// Browsers may send full paths; only the last segment is kept so a stored
/// file can never escape the upload directory. The segment is otherwise
/// kept verbatim, surrounding whitespace included.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(MediadropError::Validation(format!(
            "unusable filename: {raw:?}"
        )));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(MediadropError::Validation(
            "filename contains control characters".to_string(),
        ));
    }

    Ok(name.to_string())
}
