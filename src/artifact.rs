//! Whole-value artifact writes.
//!
//! Every artifact is encoded into memory first, written to a temporary file
//! next to its destination, then renamed into place. Missing parent
//! directories are created. Neither a failed encode nor an interrupted write
//! leaves a truncated file at the destination.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ShotdiffError;

/// Resolves `path` against the working directory without touching the
/// filesystem.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Replaces `path` with `bytes` in one rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ShotdiffError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ShotdiffError::Io(e.error))?;
    Ok(())
}

/// Encodes `image` in the format implied by the extension (PNG if unknown)
/// and writes it to `path`. Returns the absolute path written.
pub fn write_image(path: &Path, image: &DynamicImage) -> Result<PathBuf, ShotdiffError> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .map_err(|source| ShotdiffError::ImageEncode {
            path: path.to_path_buf(),
            source,
        })?;

    let bytes = buf.into_inner();
    write_atomic(path, &bytes)?;

    debug!(path = %path.display(), ?format, bytes = bytes.len(), "wrote image artifact");
    Ok(absolute(path))
}

/// Serializes `value` as pretty JSON and writes it to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ShotdiffError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| ShotdiffError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;

    write_atomic(path, &bytes)?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote json artifact");
    Ok(())
}
