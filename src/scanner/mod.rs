//! Asset discovery and classification.
//!
//! Walks the configured asset roots, classifies every image file, probes
//! dimensions from the image header (no full decode), runs kind-specific
//! compliance checks, and partitions the results into an accepted index and
//! a quarantine list. The scanner performs no writes itself; the caller
//! persists the two lists.

mod classify;
mod compliance;
mod index;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{AssetRoot, Config};
use crate::error::{KilnError, Result};

pub use classify::{asset_id, classify, AssetKind};
pub use compliance::{PROP_MAX, PROP_UNIT, SHEET_CANONICAL, SHEET_UNIT, TILE_SIZE};
pub use index::{AssetCandidate, AssetIndex, Compliance, Dimensions, Provenance};

/// File extensions the scanner considers.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Scan all configured asset roots into a partitioned index.
///
/// A single unreadable file is quarantined with a note; the scan only fails
/// if a root directory is inaccessible or two files generate the same id.
pub fn scan(config: &Config) -> Result<AssetIndex> {
    let mut files: Vec<(&AssetRoot, PathBuf)> = Vec::new();

    for root in &config.asset_roots {
        if !root.path.is_dir() {
            return Err(KilnError::Io {
                path: root.path.clone(),
                message: "Asset root is not accessible".to_string(),
            });
        }

        // Sorted walk keeps candidate order independent of filesystem
        // iteration order.
        for entry in WalkDir::new(&root.path).sort_by_file_name() {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            if !has_image_extension(&path) || config.is_excluded(&path) {
                continue;
            }
            files.push((root, path));
        }
    }

    // Header probing is the expensive part; it parallelizes per file.
    // par_iter preserves input order, so thread scheduling never leaks
    // into the index.
    let candidates: Vec<AssetCandidate> = files
        .par_iter()
        .map(|(root, path)| build_candidate(root, path, config))
        .collect();

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for candidate in &candidates {
        if let Some(first) = seen.insert(candidate.id.clone(), candidate.source_path.clone()) {
            return Err(KilnError::DuplicateId {
                id: candidate.id.clone(),
                first,
                second: candidate.source_path.clone(),
            });
        }
    }

    let mut result = AssetIndex::new();
    for candidate in candidates {
        result.push(candidate);
    }
    Ok(result)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn build_candidate(root: &AssetRoot, path: &Path, config: &Config) -> AssetCandidate {
    let relative = path.strip_prefix(&root.path).unwrap_or(path);
    let relative_str = relative.to_string_lossy().replace('\\', "/");

    let kind = classify(&relative_str);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let id = asset_id(kind, &stem);

    let mut notes = Vec::new();

    // Header-only probe; a full decode would make scanning large packs
    // unreasonably slow.
    let dimensions = match image::image_dimensions(path) {
        Ok((width, height)) => Some(Dimensions { width, height }),
        Err(e) => {
            notes.push(format!("could not read image dimensions: {}", e));
            None
        }
    };

    notes.extend(compliance::check(
        kind,
        &relative_str.to_ascii_lowercase(),
        dimensions.map(|d| (d.width, d.height)),
        (config.portrait_size[0], config.portrait_size[1]),
    ));

    let compliance = if notes.is_empty() {
        Compliance::Pass
    } else {
        Compliance::Pending
    };

    AssetCandidate {
        id,
        kind,
        source_path: path.to_path_buf(),
        provenance: Provenance {
            source: root.effective_source(),
            pack_id: pack_id(root, relative),
            license: root.license.clone(),
        },
        dimensions,
        compliance,
        notes,
    }
}

/// The pack an asset belongs to: the first directory component under the
/// root, or the root itself for top-level files.
fn pack_id(root: &AssetRoot, relative: &Path) -> String {
    let mut components = relative.components();
    let first = components.next();
    match (first, components.next()) {
        (Some(dir), Some(_)) => dir.as_os_str().to_string_lossy().to_string(),
        _ => root.effective_source(),
    }
}
