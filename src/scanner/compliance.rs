//! Kind-specific compliance rules.
//!
//! Each rule produces human-readable violation notes. An empty note list
//! means the asset passes; any note sends it to quarantine.

use super::classify::AssetKind;

/// Character sheets are laid out on a 64px grid.
pub const SHEET_UNIT: u32 = 64;

/// The canonical full character sheet (13 columns x 21 rows of 64px).
pub const SHEET_CANONICAL: (u32, u32) = (832, 1344);

/// Tiles are exactly one 32px cell.
pub const TILE_SIZE: u32 = 32;

/// Props are sized on a 16px grid, capped per axis.
pub const PROP_UNIT: u32 = 16;
pub const PROP_MAX: u32 = 96;

/// Run the compliance rules for `kind` against probed dimensions.
///
/// `relative_path` is the lowercased path under the asset root; it decides
/// whether a UI asset is a portrait.
pub fn check(
    kind: AssetKind,
    relative_path: &str,
    dimensions: Option<(u32, u32)>,
    portrait_size: (u32, u32),
) -> Vec<String> {
    let mut notes = Vec::new();

    if kind == AssetKind::Unknown {
        notes.push("unclassified".to_string());
        return notes;
    }

    let Some((width, height)) = dimensions else {
        // A probe failure note was already recorded by the scanner.
        return notes;
    };

    match kind {
        AssetKind::CharacterSheet => {
            if (width, height) != SHEET_CANONICAL {
                if width % SHEET_UNIT != 0 {
                    notes.push(format!("width {}px not multiple of {}", width, SHEET_UNIT));
                }
                if height % SHEET_UNIT != 0 {
                    notes.push(format!("height {}px not multiple of {}", height, SHEET_UNIT));
                }
            }
        }
        AssetKind::Tile => {
            if (width, height) != (TILE_SIZE, TILE_SIZE) {
                notes.push(format!(
                    "expected {0}x{0} tile, got {1}x{2}",
                    TILE_SIZE, width, height
                ));
            }
        }
        AssetKind::Ui => {
            if relative_path.contains("portrait") && (width, height) != portrait_size {
                notes.push(format!(
                    "portrait must be {}x{}, got {}x{}",
                    portrait_size.0, portrait_size.1, width, height
                ));
            }
        }
        AssetKind::Prop => {
            for (axis, value) in [("width", width), ("height", height)] {
                if value % PROP_UNIT != 0 {
                    notes.push(format!("{} {}px not multiple of {}", axis, value, PROP_UNIT));
                } else if value > PROP_MAX {
                    notes.push(format!("{} {}px exceeds {}px cap", axis, value, PROP_MAX));
                }
            }
        }
        // Tilesets are bounded against the contract atlases at validation
        // time, not here. Unknown returned above.
        AssetKind::Tileset | AssetKind::Unknown => {}
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sheet_passes() {
        let notes = check(
            AssetKind::CharacterSheet,
            "char.kim.png",
            Some(SHEET_CANONICAL),
            (256, 256),
        );
        assert!(notes.is_empty());
    }

    #[test]
    fn test_sheet_multiple_of_64_passes() {
        let notes = check(
            AssetKind::CharacterSheet,
            "char.walk.png",
            Some((128, 256)),
            (256, 256),
        );
        assert!(notes.is_empty());
    }

    #[test]
    fn test_sheet_off_grid_width_note() {
        let notes = check(
            AssetKind::CharacterSheet,
            "char.kim.png",
            Some((800, 1344)),
            (256, 256),
        );
        assert_eq!(notes, vec!["width 800px not multiple of 64"]);
    }

    #[test]
    fn test_tile_exact_size() {
        assert!(check(AssetKind::Tile, "tiles/floor.png", Some((32, 32)), (256, 256)).is_empty());

        let notes = check(AssetKind::Tile, "tiles/floor.png", Some((40, 32)), (256, 256));
        assert_eq!(notes, vec!["expected 32x32 tile, got 40x32"]);
    }

    #[test]
    fn test_portrait_exact_size() {
        assert!(check(
            AssetKind::Ui,
            "portraits/kim.png",
            Some((256, 256)),
            (256, 256)
        )
        .is_empty());

        let notes = check(AssetKind::Ui, "portraits/kim.png", Some((128, 128)), (256, 256));
        assert_eq!(notes, vec!["portrait must be 256x256, got 128x128"]);
    }

    #[test]
    fn test_non_portrait_ui_unconstrained() {
        assert!(check(AssetKind::Ui, "ui/button_ok.png", Some((90, 30)), (256, 256)).is_empty());
    }

    #[test]
    fn test_prop_grid_and_cap() {
        assert!(check(AssetKind::Prop, "props/bench.png", Some((64, 64)), (256, 256)).is_empty());
        assert!(check(AssetKind::Prop, "props/backdrop.png", Some((96, 32)), (256, 256)).is_empty());

        let notes = check(AssetKind::Prop, "props/lamp.png", Some((20, 128)), (256, 256));
        assert_eq!(
            notes,
            vec!["width 20px not multiple of 16", "height 128px exceeds 96px cap"]
        );
    }

    #[test]
    fn test_unknown_always_unclassified() {
        let notes = check(AssetKind::Unknown, "mystery.png", Some((32, 32)), (256, 256));
        assert_eq!(notes, vec!["unclassified"]);
    }

    #[test]
    fn test_missing_dimensions_add_no_rule_notes() {
        assert!(check(AssetKind::Tile, "tiles/floor.png", None, (256, 256)).is_empty());
    }
}
