//! Authored tile map model (Tiled-compatible JSON).
//!
//! This is a permissive read of the authoring tool's format: dimensions are
//! read wide (i64) and layer data is kept as raw JSON so the validator and
//! compiler can report precise, per-layer errors instead of one opaque
//! deserialization failure.

use std::path::Path;

use serde::Deserialize;

use crate::error::{KilnError, Result};

/// Kind of an authored layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Tilelayer,
    Objectgroup,
    #[serde(other)]
    Other,
}

/// One authored layer. Tile layers carry `data`; object layers carry
/// `objects`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthoredLayer {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub objects: Option<Vec<AuthoredObject>>,
}

/// One object on the Entities layer.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthoredObject {
    /// Newer Tiled versions write `class` instead of `type`.
    #[serde(rename = "type", alias = "class", default)]
    pub kind: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub properties: Vec<AuthoredProperty>,
}

/// A `{name, value}` property on an authored object.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthoredProperty {
    pub name: String,
    pub value: serde_json::Value,
}

/// A tileset reference with its offset into map tile-id space.
#[derive(Debug, Clone, Deserialize)]
pub struct TilesetRef {
    pub firstgid: u32,
    pub source: String,
    /// Present for embedded tilesets; external references omit it.
    #[serde(default)]
    pub tilewidth: Option<i64>,
}

/// One authored tile map.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthoredMap {
    pub width: i64,
    pub height: i64,
    pub tilewidth: i64,
    pub tileheight: i64,
    #[serde(default)]
    pub layers: Vec<AuthoredLayer>,
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
}

impl AuthoredMap {
    /// Load an authored map; corrupt JSON is fatal and names the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read map: {}", e),
        })?;

        serde_json::from_str(&content).map_err(|e| KilnError::Parse {
            path: path.to_path_buf(),
            message: format!("Invalid map JSON: {}", e),
            help: Some("Re-export the map from the editor".to_string()),
        })
    }

    /// Look up a layer by exact, case-sensitive name.
    pub fn layer(&self, name: &str) -> Option<&AuthoredLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// The Entities object layer, if present.
    pub fn entities_layer(&self) -> Option<&AuthoredLayer> {
        self.layer("Entities")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MINIMAL_MAP: &str = r#"{
        "width": 2, "height": 2, "tilewidth": 32, "tileheight": 32,
        "layers": [
            {"name": "Floor", "type": "tilelayer", "data": [1, 1, 1, 1]},
            {"name": "Entities", "type": "objectgroup", "objects": [
                {"type": "Door", "x": 1, "y": 0, "properties": [{"name": "target", "value": "lobby"}]}
            ]}
        ],
        "tilesets": [{"firstgid": 1, "source": "interior.tsx"}]
    }"#;

    #[test]
    fn test_parse_minimal_map() {
        let map: AuthoredMap = serde_json::from_str(MINIMAL_MAP).unwrap();

        assert_eq!(map.width, 2);
        assert_eq!(map.layer("Floor").unwrap().kind, LayerKind::Tilelayer);
        assert_eq!(map.entities_layer().unwrap().kind, LayerKind::Objectgroup);
        assert_eq!(map.tilesets[0].firstgid, 1);
    }

    #[test]
    fn test_layer_lookup_is_case_sensitive() {
        let map: AuthoredMap = serde_json::from_str(MINIMAL_MAP).unwrap();
        assert!(map.layer("floor").is_none());
    }

    #[test]
    fn test_object_class_alias() {
        let json = r#"{
            "width": 1, "height": 1, "tilewidth": 32, "tileheight": 32,
            "layers": [{"name": "Entities", "type": "objectgroup", "objects": [
                {"class": "PlayerSpawn", "x": 0, "y": 0}
            ]}]
        }"#;
        let map: AuthoredMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.entities_layer().unwrap().objects.as_ref().unwrap()[0].kind, "PlayerSpawn");
    }

    #[test]
    fn test_unknown_layer_kind_tolerated() {
        let json = r#"{
            "width": 1, "height": 1, "tilewidth": 32, "tileheight": 32,
            "layers": [{"name": "Notes", "type": "imagelayer"}]
        }"#;
        let map: AuthoredMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.layers[0].kind, LayerKind::Other);
    }

    #[test]
    fn test_load_corrupt_json_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ nope").unwrap();

        let err = AuthoredMap::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
