//! The compiled, canonical level format.
//!
//! This is the only artifact the runtime loads for level geometry. It owns
//! no reference back to the authored source; field order is fixed by the
//! struct declarations so serialization is byte-stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar entity property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    String(String),
}

/// One placed entity. Entities are value objects; ordering instability in
/// the authored file is corrected before emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl EntityData {
    /// Composite sort key: (type, x, y). The tie-break keeps compiled
    /// output independent of authored insertion order.
    pub fn cmp_key(&self, other: &Self) -> std::cmp::Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

/// A resolved tileset reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTileset {
    /// Basename of the source, without extension.
    pub key: String,
    pub first_gid: u32,
    pub source: String,
}

/// The five flattened tile layers, each `width * height` long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayers {
    pub floor: Vec<u32>,
    pub walls: Vec<u32>,
    pub trim: Vec<u32>,
    pub overlays: Vec<u32>,
    pub collision: Vec<u32>,
}

/// One compiled level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub layers: LevelLayers,
    pub entities: Vec<EntityData>,
    pub tilesets: Vec<LevelTileset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: &str, x: f64, y: f64) -> EntityData {
        EntityData {
            kind: kind.to_string(),
            x,
            y,
            width: 0.0,
            height: 0.0,
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn test_cmp_key_orders_by_type_then_position() {
        let mut entities = vec![
            entity("PlayerSpawn", 2.0, 2.0),
            entity("Door", 5.0, 3.0),
            entity("Door", 5.0, 1.0),
            entity("Door", 1.0, 9.0),
        ];
        entities.sort_by(|a, b| a.cmp_key(b));

        let keys: Vec<(String, f64, f64)> =
            entities.iter().map(|e| (e.kind.clone(), e.x, e.y)).collect();
        assert_eq!(
            keys,
            vec![
                ("Door".to_string(), 1.0, 9.0),
                ("Door".to_string(), 5.0, 1.0),
                ("Door".to_string(), 5.0, 3.0),
                ("PlayerSpawn".to_string(), 2.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_property_value_serializes_unwrapped() {
        let mut properties = BTreeMap::new();
        properties.insert("locked".to_string(), PropertyValue::Bool(true));
        properties.insert("hp".to_string(), PropertyValue::Int(3));
        properties.insert("target".to_string(), PropertyValue::String("lobby".to_string()));

        let json = serde_json::to_string(&properties).unwrap();
        assert_eq!(json, r#"{"hp":3,"locked":true,"target":"lobby"}"#);
    }

    #[test]
    fn test_entity_type_field_name() {
        let e = entity("Door", 1.0, 2.0);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""type":"Door""#));
        // Empty properties map is omitted entirely
        assert!(!json.contains("properties"));
    }
}
