//! Atomic file writing for build artifacts.
//!
//! Every compiled artifact is written to a temporary file in the target
//! directory and renamed into place, so a crash mid-write never leaves a
//! partial file visible to readers.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{KilnError, Result};

/// Write bytes to `path` atomically (temp file + rename).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| KilnError::Io {
        path: path.to_path_buf(),
        message: "Output path has no parent directory".to_string(),
    })?;

    fs::create_dir_all(parent).map_err(|e| KilnError::Io {
        path: parent.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    // Temp file must live on the same filesystem as the target for the
    // rename to be atomic.
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| KilnError::Io {
        path: parent.to_path_buf(),
        message: format!("Failed to create temp file: {}", e),
    })?;

    tmp.write_all(bytes).map_err(|e| KilnError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write temp file: {}", e),
    })?;

    tmp.persist(path).map_err(|e| KilnError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to persist temp file: {}", e),
    })?;

    Ok(())
}

/// Serialize `value` as pretty JSON with a trailing newline and write it
/// atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| KilnError::Build {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        help: None,
    })?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Write rows as NDJSON (one JSON object per line), atomically.
pub fn write_ndjson_atomic<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut buf = String::new();
    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| KilnError::Build {
            message: format!("Failed to serialize row for {}: {}", path.display(), e),
            help: None,
        })?;
        buf.push_str(&line);
        buf.push('\n');
    }
    write_atomic(path, buf.as_bytes())
}
