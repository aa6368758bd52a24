//! Asset candidates and the partitioned index.
//!
//! Candidates are immutable once created; a failing asset is routed to the
//! quarantine list, never patched in place. The index is regenerated
//! wholesale on every run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::classify::AssetKind;
use crate::error::Result;
use crate::fsutil::write_ndjson_atomic;

/// Where an asset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub source: String,
    pub pack_id: String,
    pub license: String,
}

/// Image dimensions probed from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Compliance verdict for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compliance {
    Pass,
    Pending,
}

/// One discovered file plus its classification and compliance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCandidate {
    pub id: String,
    pub kind: AssetKind,
    pub source_path: PathBuf,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub compliance: Compliance,
    pub notes: Vec<String>,
}

impl AssetCandidate {
    pub fn passes(&self) -> bool {
        self.compliance == Compliance::Pass
    }
}

/// Two disjoint, append-ordered candidate sequences partitioned solely by
/// compliance.
#[derive(Debug, Default)]
pub struct AssetIndex {
    pub passing: Vec<AssetCandidate>,
    pub quarantined: Vec<AssetCandidate>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a candidate to the partition its compliance dictates.
    pub fn push(&mut self, candidate: AssetCandidate) {
        if candidate.passes() {
            self.passing.push(candidate);
        } else {
            self.quarantined.push(candidate);
        }
    }

    pub fn total(&self) -> usize {
        self.passing.len() + self.quarantined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Write both NDJSON artifacts under `dir`.
    pub fn write(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let index_path = dir.join("asset_index.ndjson");
        let quarantine_path = dir.join("quarantine.ndjson");
        write_ndjson_atomic(&index_path, &self.passing)?;
        write_ndjson_atomic(&quarantine_path, &self.quarantined)?;
        Ok((index_path, quarantine_path))
    }
}
