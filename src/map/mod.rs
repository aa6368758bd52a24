//! Authored maps: model, contract validation, compilation, batch driver.
//!
//! Each map is an independent unit of work. The batch driver validates and
//! compiles maps on a worker pool, collects failures instead of stopping at
//! the first one, and reports everything at the end; only fatal conditions
//! (unreadable map JSON, atomic-write failure, duplicate level ids) abort
//! the stage.

mod authored;
mod compile;
mod level;
mod validate;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::contract::MapContract;
use crate::diag::DiagnosticList;
use crate::error::{KilnError, Result};
use crate::fsutil::write_json_atomic;

pub use authored::{AuthoredLayer, AuthoredMap, AuthoredObject, AuthoredProperty, LayerKind, TilesetRef};
pub use compile::compile_map;
pub use level::{EntityData, LevelData, LevelLayers, LevelTileset, PropertyValue};
pub use validate::{validate_map, ValidateContext};

/// One discovered authored map and its derived level id.
#[derive(Debug, Clone)]
pub struct MapSource {
    pub path: PathBuf,
    /// Relative path without extension, `/`-separated: `{pack}/{room}`.
    pub level_id: String,
}

/// Discover authored maps under the room roots.
///
/// Two maps resolving to the same level id is a hard error, not
/// last-write-wins: silently shadowing a sibling room corrupts every saved
/// reference to it.
pub fn discover_maps(room_roots: &[PathBuf]) -> Result<Vec<MapSource>> {
    let mut sources = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for root in room_roots {
        if !root.is_dir() {
            return Err(KilnError::Io {
                path: root.clone(),
                message: "Room root is not accessible".to_string(),
            });
        }

        for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let is_map = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json") || e.eq_ignore_ascii_case("tmj"))
                .unwrap_or(false);
            if !is_map {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(&path);
            let level_id = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            if let Some(first) = seen.insert(level_id.clone(), path.clone()) {
                return Err(KilnError::DuplicateId {
                    id: level_id,
                    first,
                    second: path,
                });
            }
            sources.push(MapSource { path, level_id });
        }
    }

    Ok(sources)
}

/// Outcome of one batch compile run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully compiled levels: (level id, output path).
    pub written: Vec<(String, PathBuf)>,
    /// Maps rejected by the contract gate; compilation was skipped.
    pub validation_failures: Vec<(String, DiagnosticList)>,
    /// Maps that passed validation but failed to compile.
    pub compile_failures: Vec<(String, String)>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.validation_failures.is_empty() || !self.compile_failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.validation_failures.len() + self.compile_failures.len()
    }

    /// Compiled level ids, sorted for registry assembly.
    pub fn compiled_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.written.iter().map(|(id, _)| id.clone()).collect();
        ids.sort();
        ids
    }
}

enum BatchItem {
    Written(String, PathBuf),
    Invalid(String, DiagnosticList),
    Failed(String, String),
}

/// Validate and compile every source, writing compiled levels under
/// `out_dir` mirroring the `{pack}/{room}.json` hierarchy.
pub fn compile_batch(
    sources: &[MapSource],
    contract: &MapContract,
    ctx: &ValidateContext,
    out_dir: &Path,
) -> Result<BatchReport> {
    // Per-map work is independent; the pool order never reaches the output
    // because items are collected back in source order.
    let items: Vec<Result<BatchItem>> = sources
        .par_iter()
        .map(|source| {
            let map = AuthoredMap::load(&source.path)?;

            let diagnostics = validate_map(&map, &source.level_id, contract, ctx);
            if diagnostics.has_errors() {
                return Ok(BatchItem::Invalid(source.level_id.clone(), diagnostics));
            }

            match compile_map(&map, &source.level_id, contract) {
                Ok(level) => {
                    let out_path = out_dir.join(format!("{}.json", source.level_id));
                    write_json_atomic(&out_path, &level)?;
                    Ok(BatchItem::Written(source.level_id.clone(), out_path))
                }
                Err(e) => Ok(BatchItem::Failed(source.level_id.clone(), e.to_string())),
            }
        })
        .collect();

    let mut report = BatchReport::default();
    for item in items {
        match item? {
            BatchItem::Written(id, path) => report.written.push((id, path)),
            BatchItem::Invalid(id, diagnostics) => {
                report.validation_failures.push((id, diagnostics))
            }
            BatchItem::Failed(id, message) => report.compile_failures.push((id, message)),
        }
    }
    Ok(report)
}
