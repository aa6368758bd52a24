//! The map contract document.
//!
//! A versioned description of what authored maps must look like: the tile
//! size, the atlas size limits, the tile identity table, the required layer
//! names, and the entity property schemas. Tile identity is an explicit
//! monotonically-increasing sequence; `diff_previous` enforces the
//! append-only invariant against the prior snapshot.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diag::{Diagnostic, DiagnosticList};
use crate::error::{KilnError, Result};

/// Layer names every authored map must carry, in canonical order.
pub const REQUIRED_LAYERS: [&str; 6] = ["Floor", "Walls", "Trim", "Overlays", "Collision", "Entities"];

/// The five tile layers (everything except the Entities object layer).
pub const TILE_LAYERS: [&str; 5] = ["Floor", "Walls", "Trim", "Overlays", "Collision"];

/// One tileset atlas and its size limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasDef {
    pub id: String,
    pub path: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
}

/// One tile with its permanently assigned index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDef {
    pub id: String,
    pub index: u32,
}

/// Kind of an entity property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    String,
    Int,
    Bool,
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKind::String => write!(f, "string"),
            PropertyKind::Int => write!(f, "int"),
            PropertyKind::Bool => write!(f, "bool"),
        }
    }
}

/// A named, typed entity property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
}

/// Property requirements for one entity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(default)]
    pub required: Vec<PropertyDef>,
    #[serde(default)]
    pub optional: Vec<PropertyDef>,
}

/// The contract document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapContract {
    pub version: u32,
    pub tile_size: u32,
    #[serde(default)]
    pub atlases: Vec<AtlasDef>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
    #[serde(default)]
    pub entities: BTreeMap<String, EntitySchema>,
}

impl MapContract {
    /// Load and self-check a contract document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read contract: {}", e),
        })?;

        let contract: MapContract =
            serde_json::from_str(&content).map_err(|e| KilnError::Parse {
                path: path.to_path_buf(),
                message: format!("Invalid contract JSON: {}", e),
                help: None,
            })?;

        contract.self_check(path)?;
        Ok(contract)
    }

    /// Duplicate tile ids or indices are a hard error; the registry and the
    /// compiled levels both require uniqueness.
    fn self_check(&self, path: &Path) -> Result<()> {
        let mut by_id: HashMap<&str, u32> = HashMap::new();
        let mut by_index: HashMap<u32, &str> = HashMap::new();

        for tile in &self.tiles {
            if by_id.insert(&tile.id, tile.index).is_some() {
                return Err(KilnError::Parse {
                    path: path.to_path_buf(),
                    message: format!("Contract tile id '{}' is declared twice", tile.id),
                    help: Some("Tile ids must be unique".to_string()),
                });
            }
            if let Some(existing) = by_index.insert(tile.index, &tile.id) {
                return Err(KilnError::Parse {
                    path: path.to_path_buf(),
                    message: format!(
                        "Contract tile index {} is assigned to both '{}' and '{}'",
                        tile.index, existing, tile.id
                    ),
                    help: Some("Tile indices must be unique".to_string()),
                });
            }
        }

        Ok(())
    }

    pub fn entity_schema(&self, entity_type: &str) -> Option<&EntitySchema> {
        self.entities.get(entity_type)
    }

    /// Declared kind for an entity property (required or optional).
    pub fn property_kind(&self, entity_type: &str, property: &str) -> Option<PropertyKind> {
        let schema = self.entities.get(entity_type)?;
        schema
            .required
            .iter()
            .chain(&schema.optional)
            .find(|p| p.name == property)
            .map(|p| p.kind)
    }

    pub fn atlas(&self, id: &str) -> Option<&AtlasDef> {
        self.atlases.iter().find(|a| a.id == id)
    }

    /// Enforce the append-only tile identity invariant against a previous
    /// contract snapshot.
    ///
    /// Every tile in `previous` must still exist with the same assigned
    /// index; violations silently corrupt previously-saved references, so
    /// they are reported as errors rather than detected downstream.
    pub fn diff_previous(&self, previous: &MapContract) -> DiagnosticList {
        let mut result = DiagnosticList::new();

        let current: HashMap<&str, u32> = self
            .tiles
            .iter()
            .map(|t| (t.id.as_str(), t.index))
            .collect();

        for tile in &previous.tiles {
            match current.get(tile.id.as_str()) {
                None => result.push(
                    Diagnostic::error(
                        "kiln::contract::tile-removed",
                        format!("Tile id '{}' was removed from the contract", tile.id),
                    )
                    .with_help("Tile ids are append-only; restore the entry"),
                ),
                Some(&index) if index != tile.index => result.push(
                    Diagnostic::error(
                        "kiln::contract::tile-moved",
                        format!(
                            "Tile id '{}' moved from index {} to {}",
                            tile.id, tile.index, index
                        ),
                    )
                    .with_help("Tile indices are append-only; assign new tiles the next free index"),
                ),
                Some(_) => {}
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_contract() -> MapContract {
        MapContract {
            version: 1,
            tile_size: 32,
            atlases: vec![AtlasDef {
                id: "atlas.interior".to_string(),
                path: PathBuf::from("tilesets/interior.png"),
                max_width: 2048,
                max_height: 2048,
            }],
            tiles: vec![
                TileDef { id: "tile.floor".to_string(), index: 0 },
                TileDef { id: "tile.wall".to_string(), index: 1 },
            ],
            entities: BTreeMap::from([(
                "Door".to_string(),
                EntitySchema {
                    required: vec![PropertyDef {
                        name: "target".to_string(),
                        kind: PropertyKind::String,
                    }],
                    optional: vec![PropertyDef {
                        name: "locked".to_string(),
                        kind: PropertyKind::Bool,
                    }],
                },
            )]),
        }
    }

    #[test]
    fn test_load_valid_contract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contract.json");
        fs::write(&path, serde_json::to_string(&sample_contract()).unwrap()).unwrap();

        let contract = MapContract::load(&path).unwrap();
        assert_eq!(contract.tile_size, 32);
        assert_eq!(contract.tiles.len(), 2);
    }

    #[test]
    fn test_load_rejects_duplicate_tile_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contract.json");
        let mut contract = sample_contract();
        contract.tiles.push(TileDef { id: "tile.floor".to_string(), index: 7 });
        fs::write(&path, serde_json::to_string(&contract).unwrap()).unwrap();

        let err = MapContract::load(&path).unwrap_err();
        assert!(err.to_string().contains("tile.floor"));
    }

    #[test]
    fn test_load_rejects_duplicate_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contract.json");
        let mut contract = sample_contract();
        contract.tiles.push(TileDef { id: "tile.trim".to_string(), index: 1 });
        fs::write(&path, serde_json::to_string(&contract).unwrap()).unwrap();

        assert!(MapContract::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_corrupt_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contract.json");
        fs::write(&path, "{ not json").unwrap();

        let err = MapContract::load(&path).unwrap_err();
        assert!(err.to_string().contains("contract.json"));
    }

    #[test]
    fn test_property_kind_lookup() {
        let contract = sample_contract();
        assert_eq!(
            contract.property_kind("Door", "target"),
            Some(PropertyKind::String)
        );
        assert_eq!(
            contract.property_kind("Door", "locked"),
            Some(PropertyKind::Bool)
        );
        assert_eq!(contract.property_kind("Door", "missing"), None);
        assert_eq!(contract.property_kind("Ghost", "target"), None);
    }

    #[test]
    fn test_diff_unchanged_is_clean() {
        let contract = sample_contract();
        assert!(contract.diff_previous(&sample_contract()).is_empty());
    }

    #[test]
    fn test_diff_appended_tile_is_clean() {
        let mut next = sample_contract();
        next.tiles.push(TileDef { id: "tile.trim".to_string(), index: 2 });

        assert!(next.diff_previous(&sample_contract()).is_empty());
    }

    #[test]
    fn test_diff_detects_removed_tile() {
        let mut next = sample_contract();
        next.tiles.remove(0);

        let result = next.diff_previous(&sample_contract());
        assert_eq!(result.error_count(), 1);
        let diagnostic = result.iter().next().unwrap();
        assert!(diagnostic.message.contains("tile.floor"));
        assert!(diagnostic.message.contains("removed"));
    }

    #[test]
    fn test_diff_detects_moved_index() {
        let mut next = sample_contract();
        next.tiles[0].index = 5;
        next.tiles[1].index = 0;

        let result = next.diff_previous(&sample_contract());
        assert_eq!(result.error_count(), 2);
        assert!(result
            .iter()
            .any(|d| d.message.contains("'tile.floor' moved from index 0 to 5")));
    }
}
