//! The base registry template.
//!
//! Assembly always starts from this fixed template, never from a
//! previously-generated registry, so stale state cannot leak between
//! builds. The template carries the schema rules and defaults that are not
//! derived from compiled entities.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KilnError, Result};
use crate::registry::types::SpriteEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryTemplate {
    pub tile_size: u32,
    pub scale: u32,
    /// Sprites that are not derived from compiled characters (tilesets, UI).
    pub sprites: BTreeMap<String, SpriteEntry>,
    pub flashcard_packs: Vec<serde_json::Value>,
    pub ink: Vec<serde_json::Value>,
    pub outfits: BTreeMap<String, serde_json::Value>,
    /// Entity schema table, mirrored into the registry for the runtime.
    pub entities: BTreeMap<String, serde_json::Value>,
    pub tags: Vec<String>,
}

impl Default for RegistryTemplate {
    fn default() -> Self {
        Self {
            tile_size: 32,
            scale: 2,
            sprites: BTreeMap::new(),
            flashcard_packs: vec![],
            ink: vec![],
            outfits: BTreeMap::new(),
            entities: BTreeMap::new(),
            tags: vec![],
        }
    }
}

impl RegistryTemplate {
    /// Load a template document; corrupt JSON is fatal and names the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read registry template: {}", e),
        })?;

        serde_json::from_str(&content).map_err(|e| KilnError::Parse {
            path: path.to_path_buf(),
            message: format!("Invalid registry template JSON: {}", e),
            help: None,
        })
    }

    /// Load from `path` if present, the built-in defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_template() {
        let template = RegistryTemplate::default();
        assert_eq!(template.tile_size, 32);
        assert_eq!(template.scale, 2);
        assert!(template.sprites.is_empty());
    }

    #[test]
    fn test_load_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.base.json");
        fs::write(
            &path,
            r#"{
                "tileSize": 32,
                "scale": 2,
                "outfits": {"robe": {"layers": ["base", "robe"]}},
                "tags": ["courthouse"]
            }"#,
        )
        .unwrap();

        let template = RegistryTemplate::load(&path).unwrap();
        assert_eq!(template.tags, vec!["courthouse"]);
        assert!(template.outfits.contains_key("robe"));
    }

    #[test]
    fn test_load_corrupt_template_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.base.json");
        fs::write(&path, "not json").unwrap();

        let err = RegistryTemplate::load(&path).unwrap_err();
        assert!(err.to_string().contains("registry.base.json"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let template =
            RegistryTemplate::load_or_default(Path::new("/nonexistent/registry.base.json"))
                .unwrap();
        assert_eq!(template.tile_size, 32);
    }
}
