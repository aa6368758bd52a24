//! Project configuration (kiln.yaml) parsing.
//!
//! The config carries explicit directory configuration for every pipeline
//! stage: asset roots with provenance defaults, room roots, the contract
//! and registry template paths, and the generated output directory. Stages
//! receive these paths explicitly so they are testable against temp
//! directories; nothing reads a hardcoded well-known location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KilnError, Result};

/// The name of the config file.
pub const CONFIG_FILENAME: &str = "kiln.yaml";

/// One asset root with its provenance defaults.
///
/// Imported packs carry their upstream source and license; both are
/// recorded on every candidate discovered under the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRoot {
    pub path: PathBuf,

    /// Upstream source name (e.g. "lpc"). Defaults to the root directory name.
    #[serde(default)]
    pub source: Option<String>,

    /// License of assets under this root (e.g. "CC-BY-SA 3.0").
    #[serde(default = "default_license")]
    pub license: String,
}

fn default_license() -> String {
    "unknown".to_string()
}

impl AssetRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: None,
            license: default_license(),
        }
    }

    /// Effective source name: configured, or the root directory name.
    pub fn effective_source(&self) -> String {
        match &self.source {
            Some(s) => s.clone(),
            None => self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Project configuration loaded from kiln.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Asset directories to scan.
    pub asset_roots: Vec<AssetRoot>,

    /// Authored room-pack directories containing Tiled JSON maps.
    pub room_roots: Vec<PathBuf>,

    /// Path to the map contract document.
    pub contract: PathBuf,

    /// Path to the base registry template.
    pub template: PathBuf,

    /// Directory that receives all generated artifacts.
    pub generated: PathBuf,

    /// Directory of compiled per-character artifacts consumed by assemble.
    pub characters: PathBuf,

    /// Required portrait dimensions [width, height].
    pub portrait_size: [u32; 2],

    /// Patterns to exclude from asset discovery.
    pub excludes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_roots: vec![],
            room_roots: vec![],
            contract: PathBuf::from("content/contract.json"),
            template: PathBuf::from("content/registry.base.json"),
            generated: PathBuf::from("public/generated"),
            characters: PathBuf::from("public/generated/characters"),
            portrait_size: [256, 256],
            excludes: vec![],
        }
    }
}

impl Config {
    /// Load config from a kiln.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;
        Self::parse(&content, path)
    }

    /// Load config from `path` if present, the defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from YAML text.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| KilnError::Parse {
            path: path.to_path_buf(),
            message: format!("Invalid config: {}", e),
            help: Some("Check kiln.yaml syntax".to_string()),
        })
    }

    /// Directory for compiled level artifacts.
    pub fn levels_dir(&self) -> PathBuf {
        self.generated.join("levels")
    }

    /// Path of the compiled registry document.
    pub fn registry_path(&self) -> PathBuf {
        self.generated.join("registry.json")
    }

    /// Path of the accepted asset index.
    pub fn asset_index_path(&self) -> PathBuf {
        self.generated.join("asset_index.ndjson")
    }

    /// Path of the quarantine list.
    pub fn quarantine_path(&self) -> PathBuf {
        self.generated.join("quarantine.ndjson")
    }

    /// Check whether a path matches any exclude pattern.
    ///
    /// Supports `*.ext` suffix patterns, `dir/*` prefix patterns, and bare
    /// substrings.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.excludes.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                text.ends_with(suffix)
            } else if let Some(dir) = pattern.strip_suffix("/*") {
                text.starts_with(&format!("{}/", dir)) || text.contains(&format!("/{}/", dir))
            } else {
                text.contains(pattern.as_str())
            }
        })
    }
}
