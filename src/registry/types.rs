//! The unified content registry document.
//!
//! Runtime code consumes the registry exclusively through the typed
//! accessors here; application code never builds raw paths or reaches into
//! the JSON by hand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A sprite sheet entry, keyed by sprite id in `Registry::sprites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
}

/// One playable or non-playable character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEntry {
    pub id: String,
    pub spec_url: String,
    pub sprite_key: String,
}

/// The unified content manifest, written whole on every build.
///
/// `build_id` is the one intentionally non-deterministic field; everything
/// else is byte-identical across repeated runs with identical inputs.
/// Collections use `BTreeMap` and `Vec` so serialization order never
/// depends on hash-map iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub build_id: String,
    pub tile_size: u32,
    pub scale: u32,
    pub sprites: BTreeMap<String, SpriteEntry>,
    pub characters: Vec<CharacterEntry>,
    pub rooms: Vec<String>,
    pub flashcard_packs: Vec<serde_json::Value>,
    pub ink: Vec<serde_json::Value>,
    pub outfits: BTreeMap<String, serde_json::Value>,
    pub entities: BTreeMap<String, serde_json::Value>,
    pub tags: Vec<String>,
}

impl Registry {
    pub fn sprite(&self, key: &str) -> Option<&SpriteEntry> {
        self.sprites.get(key)
    }

    pub fn character(&self, id: &str) -> Option<&CharacterEntry> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn has_room(&self, level_id: &str) -> bool {
        self.rooms.iter().any(|r| r == level_id)
    }
}
