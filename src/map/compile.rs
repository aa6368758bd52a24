//! Map compiler: authored map → canonical LevelData.
//!
//! A deterministic pure transform. Validation (the contract gate) runs
//! before compilation, but the compiler defends independently: a missing
//! tile layer compiles to an all-zero array so the LevelData shape stays
//! stable, and malformed layer data is a compile error naming the
//! offending layer or object.

use std::collections::BTreeMap;
use std::path::Path;

use super::authored::{AuthoredMap, AuthoredObject};
use super::level::{EntityData, LevelData, LevelLayers, LevelTileset, PropertyValue};
use crate::contract::{MapContract, PropertyKind};
use crate::error::{KilnError, Result};

/// Compile one validated authored map.
pub fn compile_map(map: &AuthoredMap, level_id: &str, contract: &MapContract) -> Result<LevelData> {
    if map.width <= 0 || map.height <= 0 {
        return Err(compile_error(format!(
            "Map '{}' has invalid dimensions {}x{}",
            level_id, map.width, map.height
        )));
    }
    let width = map.width as u32;
    let height = map.height as u32;
    let expected = (width as usize) * (height as usize);

    let layers = LevelLayers {
        floor: flatten_tile_layer(map, "Floor", level_id, expected)?,
        walls: flatten_tile_layer(map, "Walls", level_id, expected)?,
        trim: flatten_tile_layer(map, "Trim", level_id, expected)?,
        overlays: flatten_tile_layer(map, "Overlays", level_id, expected)?,
        collision: flatten_tile_layer(map, "Collision", level_id, expected)?,
    };

    let mut entities = map
        .entities_layer()
        .and_then(|l| l.objects.as_deref())
        .unwrap_or(&[])
        .iter()
        .map(|object| compile_entity(object, level_id, contract))
        .collect::<Result<Vec<_>>>()?;
    entities.sort_by(|a, b| a.cmp_key(b));

    let mut tilesets: Vec<LevelTileset> = map
        .tilesets
        .iter()
        .map(|t| LevelTileset {
            key: source_key(&t.source),
            first_gid: t.firstgid,
            source: t.source.clone(),
        })
        .collect();
    tilesets.sort_by_key(|t| t.first_gid);

    Ok(LevelData {
        id: level_id.to_string(),
        width,
        height,
        tile_size: contract.tile_size,
        layers,
        entities,
        tilesets,
    })
}

/// Flatten a named tile layer to a 1D tile-index array of `expected` cells.
fn flatten_tile_layer(
    map: &AuthoredMap,
    name: &str,
    level_id: &str,
    expected: usize,
) -> Result<Vec<u32>> {
    let Some(data) = map.layer(name).and_then(|l| l.data.as_ref()) else {
        return Ok(vec![0; expected]);
    };

    let Some(rows_or_cells) = data.as_array() else {
        return Err(compile_error(format!(
            "Layer '{}' of map '{}': data is not an array",
            name, level_id
        )));
    };

    let mut out = Vec::with_capacity(expected);
    for value in rows_or_cells {
        // Authored data may arrive flattened or as row arrays.
        if let Some(row) = value.as_array() {
            for cell in row {
                out.push(tile_index(cell, name, level_id, out.len())?);
            }
        } else {
            out.push(tile_index(value, name, level_id, out.len())?);
        }
    }

    if out.len() != expected {
        return Err(compile_error(format!(
            "Layer '{}' of map '{}' has {} tiles; expected {}",
            name,
            level_id,
            out.len(),
            expected
        )));
    }

    Ok(out)
}

fn tile_index(
    value: &serde_json::Value,
    layer: &str,
    level_id: &str,
    position: usize,
) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            compile_error(format!(
                "Layer '{}' of map '{}': tile index at position {} is not a non-negative integer (found {})",
                layer, level_id, position, value
            ))
        })
}

fn compile_entity(
    object: &AuthoredObject,
    level_id: &str,
    contract: &MapContract,
) -> Result<EntityData> {
    let mut properties = BTreeMap::new();

    for property in &object.properties {
        let declared = contract.property_kind(&object.kind, &property.name);
        let value = coerce_property(&property.value, declared).ok_or_else(|| {
            compile_error(format!(
                "Map '{}': entity '{}' at ({}, {}): property '{}' has unusable value {}",
                level_id, object.kind, object.x, object.y, property.name, property.value
            ))
        })?;
        properties.insert(property.name.clone(), value);
    }

    Ok(EntityData {
        kind: object.kind.clone(),
        x: object.x,
        y: object.y,
        width: object.width,
        height: object.height,
        properties,
    })
}

/// Coerce an authored JSON value to the declared property kind, or infer
/// from the JSON type when the schema does not declare one.
fn coerce_property(
    value: &serde_json::Value,
    declared: Option<PropertyKind>,
) -> Option<PropertyValue> {
    use serde_json::Value;

    match declared {
        Some(PropertyKind::String) => match value {
            Value::String(s) => Some(PropertyValue::String(s.clone())),
            Value::Number(n) => Some(PropertyValue::String(n.to_string())),
            Value::Bool(b) => Some(PropertyValue::String(b.to_string())),
            _ => None,
        },
        Some(PropertyKind::Int) => match value {
            Value::Number(_) => as_int(value),
            Value::String(s) => s.parse().ok().map(PropertyValue::Int),
            _ => None,
        },
        Some(PropertyKind::Bool) => match value {
            Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            Value::String(s) => s.parse().ok().map(PropertyValue::Bool),
            _ => None,
        },
        None => match value {
            Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            Value::Number(_) => as_int(value),
            Value::String(s) => Some(PropertyValue::String(s.clone())),
            _ => None,
        },
    }
}

fn as_int(value: &serde_json::Value) -> Option<PropertyValue> {
    if let Some(n) = value.as_i64() {
        return Some(PropertyValue::Int(n));
    }
    // Authoring tools write integral floats ("3.0") for int properties.
    value.as_f64().and_then(|f| {
        if f.fract() == 0.0 {
            Some(PropertyValue::Int(f as i64))
        } else {
            None
        }
    })
}

/// Tileset key: basename of the source without extension.
fn source_key(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string())
}

fn compile_error(message: String) -> KilnError {
    KilnError::Compile { message, help: None }
}
