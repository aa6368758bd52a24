//! Map contract validation.
//!
//! Runs a fixed sequence of independent checks. Every check always runs
//! (no early abort) so the caller receives the complete error set in one
//! pass. Validation is read-only: running it twice on unchanged input
//! yields an identical diagnostic list.

use std::path::PathBuf;

use walkdir::WalkDir;

use super::authored::{AuthoredMap, LayerKind};
use crate::contract::{MapContract, PropertyKind, REQUIRED_LAYERS};
use crate::diag::{Diagnostic, DiagnosticList};

/// Filesystem context for the checks that look beyond the map document.
#[derive(Debug, Clone, Default)]
pub struct ValidateContext {
    /// Roots swept for forbidden metadata artifacts.
    pub search_roots: Vec<PathBuf>,
    /// Directory atlas paths in the contract are resolved against.
    pub atlas_base: PathBuf,
}

/// Validate one authored map against the contract.
///
/// A non-empty error list gates compilation; callers must not compile a
/// failing map.
pub fn validate_map(
    map: &AuthoredMap,
    map_id: &str,
    contract: &MapContract,
    ctx: &ValidateContext,
) -> DiagnosticList {
    let mut result = DiagnosticList::new();

    result.merge(check_tile_size(map, map_id, contract));
    result.merge(check_required_layers(map, map_id));
    result.merge(check_atlas_bounds(contract, ctx));
    result.merge(check_entity_schema(map, map_id, contract));
    result.merge(check_forbidden_artifacts(ctx));

    result
}

fn check_tile_size(map: &AuthoredMap, map_id: &str, contract: &MapContract) -> DiagnosticList {
    let mut result = DiagnosticList::new();
    let expected = i64::from(contract.tile_size);

    if map.tilewidth != expected || map.tileheight != expected {
        result.push(Diagnostic::error(
            "kiln::validate::tile-size",
            format!(
                "Map '{}' tile size is {}x{}; contract requires {}",
                map_id, map.tilewidth, map.tileheight, contract.tile_size
            ),
        ));
    }

    for tileset in &map.tilesets {
        if let Some(tilewidth) = tileset.tilewidth {
            if tilewidth != expected {
                result.push(Diagnostic::error(
                    "kiln::validate::tile-size",
                    format!(
                        "Map '{}': tileset '{}' declares tile size {}; contract requires {}",
                        map_id, tileset.source, tilewidth, contract.tile_size
                    ),
                ));
            }
        }
    }

    result
}

fn check_required_layers(map: &AuthoredMap, map_id: &str) -> DiagnosticList {
    let mut result = DiagnosticList::new();

    for name in REQUIRED_LAYERS {
        let Some(layer) = map.layer(name) else {
            result.push(
                Diagnostic::error(
                    "kiln::validate::missing-layer",
                    format!("Map '{}': required layer '{}' is missing", map_id, name),
                )
                .with_help("Layer names are exact and case-sensitive"),
            );
            continue;
        };

        let expected = if name == "Entities" {
            LayerKind::Objectgroup
        } else {
            LayerKind::Tilelayer
        };
        if layer.kind != expected {
            let wanted = if name == "Entities" { "an object layer" } else { "a tile layer" };
            result.push(Diagnostic::error(
                "kiln::validate::layer-kind",
                format!("Map '{}': layer '{}' must be {}", map_id, name, wanted),
            ));
        }
    }

    result
}

fn check_atlas_bounds(contract: &MapContract, ctx: &ValidateContext) -> DiagnosticList {
    let mut result = DiagnosticList::new();

    for atlas in &contract.atlases {
        let path = ctx.atlas_base.join(&atlas.path);
        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                if width > atlas.max_width || height > atlas.max_height {
                    result.push(Diagnostic::error(
                        "kiln::validate::atlas-bounds",
                        format!(
                            "Atlas '{}' is {}x{}, exceeds limit {}x{}",
                            atlas.id, width, height, atlas.max_width, atlas.max_height
                        ),
                    ));
                }
            }
            Err(e) => {
                result.push(Diagnostic::error(
                    "kiln::validate::atlas-bounds",
                    format!(
                        "Atlas '{}': could not read {}: {}",
                        atlas.id,
                        path.display(),
                        e
                    ),
                ));
            }
        }
    }

    result
}

fn check_entity_schema(map: &AuthoredMap, map_id: &str, contract: &MapContract) -> DiagnosticList {
    let mut result = DiagnosticList::new();

    let objects = map
        .entities_layer()
        .and_then(|l| l.objects.as_deref())
        .unwrap_or(&[]);

    for object in objects {
        if object.kind.is_empty() {
            result.push(Diagnostic::error(
                "kiln::validate::entity-schema",
                format!(
                    "Map '{}': entity at ({}, {}) has no type",
                    map_id, object.x, object.y
                ),
            ));
            continue;
        }

        let Some(schema) = contract.entity_schema(&object.kind) else {
            result.push(Diagnostic::error(
                "kiln::validate::entity-schema",
                format!(
                    "Map '{}': entity at ({}, {}) has unknown type '{}'",
                    map_id, object.x, object.y, object.kind
                ),
            ));
            continue;
        };

        for property in &schema.required {
            let Some(found) = object.properties.iter().find(|p| p.name == property.name) else {
                result.push(Diagnostic::error(
                    "kiln::validate::entity-schema",
                    format!(
                        "Map '{}': entity '{}' at ({}, {}) is missing required property '{}' ({})",
                        map_id, object.kind, object.x, object.y, property.name, property.kind
                    ),
                ));
                continue;
            };

            if !value_matches(&found.value, property.kind) {
                result.push(Diagnostic::error(
                    "kiln::validate::entity-schema",
                    format!(
                        "Map '{}': entity '{}' at ({}, {}): property '{}' must be {}",
                        map_id, object.kind, object.x, object.y, property.name, property.kind
                    ),
                ));
            }
        }
    }

    result
}

fn value_matches(value: &serde_json::Value, kind: PropertyKind) -> bool {
    match kind {
        PropertyKind::String => value.is_string(),
        PropertyKind::Int => value.as_i64().is_some(),
        PropertyKind::Bool => value.is_boolean(),
    }
}

/// macOS metadata directories are a known source of spurious files that
/// pollute classification; their presence anywhere under the search roots
/// is a hard failure.
fn check_forbidden_artifacts(ctx: &ValidateContext) -> DiagnosticList {
    let mut result = DiagnosticList::new();

    for root in &ctx.search_roots {
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
            let name = entry.file_name().to_string_lossy();
            let forbidden = (entry.file_type().is_dir() && name == "__MACOSX")
                || (entry.file_type().is_file() && name == ".DS_Store");
            if forbidden {
                result.push(
                    Diagnostic::error(
                        "kiln::validate::forbidden-artifact",
                        format!(
                            "macOS metadata artifact found at {}",
                            entry.path().display()
                        ),
                    )
                    .with_help(
                        "Delete it and re-run: find <roots> \\( -name __MACOSX -o -name .DS_Store \\) -exec rm -rf {} +",
                    ),
                );
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{AtlasDef, EntitySchema, MapContract, PropertyDef, TileDef};
    use image::RgbaImage;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn contract() -> MapContract {
        MapContract {
            version: 1,
            tile_size: 32,
            atlases: vec![],
            tiles: vec![TileDef { id: "tile.floor".to_string(), index: 0 }],
            entities: BTreeMap::from([
                (
                    "Door".to_string(),
                    EntitySchema {
                        required: vec![PropertyDef {
                            name: "target".to_string(),
                            kind: PropertyKind::String,
                        }],
                        optional: vec![],
                    },
                ),
                ("PlayerSpawn".to_string(), EntitySchema::default()),
            ]),
        }
    }

    fn full_map_json() -> String {
        let tile_layer = |name: &str| {
            format!(
                r#"{{"name": "{}", "type": "tilelayer", "data": [0, 0, 0, 0]}}"#,
                name
            )
        };
        format!(
            r#"{{
                "width": 2, "height": 2, "tilewidth": 32, "tileheight": 32,
                "layers": [
                    {}, {}, {}, {}, {},
                    {{"name": "Entities", "type": "objectgroup", "objects": [
                        {{"type": "Door", "x": 5, "y": 3, "properties": [{{"name": "target", "value": "lobby"}}]}}
                    ]}}
                ],
                "tilesets": [{{"firstgid": 1, "source": "interior.tsx"}}]
            }}"#,
            tile_layer("Floor"),
            tile_layer("Walls"),
            tile_layer("Trim"),
            tile_layer("Overlays"),
            tile_layer("Collision"),
        )
    }

    fn parse(json: &str) -> AuthoredMap {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_map_is_clean() {
        let map = parse(&full_map_json());
        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());
        assert!(result.is_empty(), "unexpected: {:?}", result);
    }

    #[test]
    fn test_missing_collision_layer_named() {
        let json = full_map_json().replace("\"Collision\"", "\"collision\"");
        let map = parse(&json);

        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());

        assert!(result.has_errors());
        assert!(result
            .iter()
            .any(|d| d.message.contains("'Collision' is missing")));
    }

    #[test]
    fn test_wrong_tile_size() {
        let json = full_map_json().replace("\"tilewidth\": 32", "\"tilewidth\": 16");
        let map = parse(&json);

        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());

        assert!(result.iter().any(|d| d.code == "kiln::validate::tile-size"
            && d.message.contains("16x32")));
    }

    #[test]
    fn test_unknown_entity_type_named() {
        let json = full_map_json().replace("\"type\": \"Door\"", "\"type\": \"Ghost\"");
        let map = parse(&json);

        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());

        assert!(result
            .iter()
            .any(|d| d.message.contains("unknown type 'Ghost'")));
    }

    #[test]
    fn test_missing_required_property() {
        let json = full_map_json().replace(
            r#"[{"name": "target", "value": "lobby"}]"#,
            "[]",
        );
        let map = parse(&json);

        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());

        assert!(result
            .iter()
            .any(|d| d.message.contains("missing required property 'target' (string)")));
    }

    #[test]
    fn test_wrong_property_kind() {
        let json = full_map_json().replace(
            r#"{"name": "target", "value": "lobby"}"#,
            r#"{"name": "target", "value": 7}"#,
        );
        let map = parse(&json);

        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());

        assert!(result
            .iter()
            .any(|d| d.message.contains("property 'target' must be string")));
    }

    #[test]
    fn test_entities_layer_must_be_object_layer() {
        let json = full_map_json().replace(
            r#""name": "Entities", "type": "objectgroup", "objects""#,
            r#""name": "Entities", "type": "tilelayer", "objects""#,
        );
        let map = parse(&json);

        let result = validate_map(&map, "lobby", &contract(), &ValidateContext::default());

        assert!(result
            .iter()
            .any(|d| d.message.contains("'Entities' must be an object layer")));
    }

    #[test]
    fn test_atlas_over_limit_names_atlas_id() {
        let dir = tempdir().unwrap();
        RgbaImage::new(2100, 64)
            .save(dir.path().join("interior.png"))
            .unwrap();

        let mut contract = contract();
        contract.atlases.push(AtlasDef {
            id: "atlas.interior".to_string(),
            path: "interior.png".into(),
            max_width: 2048,
            max_height: 2048,
        });
        let ctx = ValidateContext {
            search_roots: vec![],
            atlas_base: dir.path().to_path_buf(),
        };

        let map = parse(&full_map_json());
        let result = validate_map(&map, "lobby", &contract, &ctx);

        assert!(result
            .iter()
            .any(|d| d.message.contains("Atlas 'atlas.interior' is 2100x64")));
    }

    #[test]
    fn test_unreadable_atlas_is_an_error() {
        let mut contract = contract();
        contract.atlases.push(AtlasDef {
            id: "atlas.missing".to_string(),
            path: "missing.png".into(),
            max_width: 2048,
            max_height: 2048,
        });

        let map = parse(&full_map_json());
        let result = validate_map(&map, "lobby", &contract, &ValidateContext::default());

        assert!(result
            .iter()
            .any(|d| d.message.contains("Atlas 'atlas.missing'")));
    }

    #[test]
    fn test_forbidden_artifacts_detected() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pack/__MACOSX")).unwrap();
        fs::write(dir.path().join("pack/.DS_Store"), b"junk").unwrap();

        let ctx = ValidateContext {
            search_roots: vec![dir.path().to_path_buf()],
            atlas_base: PathBuf::new(),
        };

        let map = parse(&full_map_json());
        let result = validate_map(&map, "lobby", &contract(), &ctx);

        assert_eq!(
            result
                .iter()
                .filter(|d| d.code == "kiln::validate::forbidden-artifact")
                .count(),
            2
        );
        assert!(result.iter().any(|d| d.help.is_some()));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let json = full_map_json()
            .replace("\"Collision\"", "\"collision\"")
            .replace("\"type\": \"Door\"", "\"type\": \"Ghost\"");
        let map = parse(&json);

        let run = || {
            validate_map(&map, "lobby", &contract(), &ValidateContext::default())
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
