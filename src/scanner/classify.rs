//! Asset kind classification.
//!
//! Classification is a fixed, priority-ordered table of `(predicate, kind)`
//! pairs over the lowercased relative path. The first matching rule wins,
//! so kind-specific logic elsewhere is a checked `match`, not substring
//! branching at every call site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a scanned asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    CharacterSheet,
    Tile,
    Tileset,
    Prop,
    Ui,
    Unknown,
}

impl AssetKind {
    /// Namespace prefix used in generated ids.
    pub fn prefix(&self) -> &'static str {
        match self {
            AssetKind::CharacterSheet => "char",
            AssetKind::Tile => "tile",
            AssetKind::Tileset => "tileset",
            AssetKind::Prop => "prop",
            AssetKind::Ui => "ui",
            AssetKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

type Predicate = fn(&str) -> bool;

/// Priority-ordered classification rules.
///
/// Tilesets are matched before tiles so "tileset_interior.png" never
/// classifies as a single tile.
const RULES: &[(Predicate, AssetKind)] = &[
    (is_tileset, AssetKind::Tileset),
    (is_character_sheet, AssetKind::CharacterSheet),
    (is_ui, AssetKind::Ui),
    (is_tile, AssetKind::Tile),
    (is_prop, AssetKind::Prop),
];

fn is_tileset(path: &str) -> bool {
    path.contains("tileset") || path.contains("atlas")
}

fn is_character_sheet(path: &str) -> bool {
    path.contains("character") || has_component(path, "characters") || stem_prefix(path, "char")
}

fn is_ui(path: &str) -> bool {
    path.contains("portrait")
        || has_component(path, "ui")
        || stem_prefix(path, "ui")
        || path.contains("icon")
        || path.contains("button")
}

fn is_tile(path: &str) -> bool {
    path.contains("tile") || has_component(path, "terrain")
}

fn is_prop(path: &str) -> bool {
    path.contains("prop")
        || has_component(path, "furniture")
        || has_component(path, "objects")
        || stem_prefix(path, "prop")
}

/// True when `name` appears as a whole path component.
fn has_component(path: &str, name: &str) -> bool {
    path.split('/').any(|c| c == name)
}

/// True when the file name starts with `prefix` followed by a separator.
fn stem_prefix(path: &str, prefix: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    [".", "_", "-"]
        .iter()
        .any(|sep| file.starts_with(&format!("{}{}", prefix, sep)))
}

/// Classify a file by its relative path (lowercased, `/`-separated).
pub fn classify(relative_path: &str) -> AssetKind {
    let path = relative_path.to_ascii_lowercase().replace('\\', "/");
    for (predicate, kind) in RULES {
        if predicate(&path) {
            return *kind;
        }
    }
    AssetKind::Unknown
}

/// Generate a namespaced asset id from a kind and a file stem.
///
/// The stem is lowercased and non-alphanumerics collapse to `_`. A stem
/// already carrying the kind prefix ("char.kim") is not double-prefixed.
pub fn asset_id(kind: AssetKind, stem: &str) -> String {
    let stem = stem.to_ascii_lowercase();
    let prefix = kind.prefix();

    let rest = [".", "_", "-"]
        .iter()
        .find_map(|sep| stem.strip_prefix(&format!("{}{}", prefix, sep)))
        .unwrap_or(&stem);

    format!("{}.{}", prefix, normalize(rest))
}

/// Lowercase and collapse runs of non-alphanumerics into single `_`.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_sep = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
