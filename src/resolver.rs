//! Runtime-side registry and level resolution.
//!
//! The resolver is the only place runtime code derives artifact paths.
//! Derivation is pure string convention (`{base}/{levelId}.json`); callers
//! never hand the resolver raw path fragments outside that convention. A
//! missing or corrupt manifest degrades to a small built-in table of known
//! level ids so a dev build without generated content stays usable.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{KilnError, Result};
use crate::registry::Registry;

/// Known level ids used when the manifest cannot be loaded.
pub const FALLBACK_LEVELS: &[&str] = &[
    "courthouse/lobby",
    "courthouse/courtroom",
    "courthouse/library",
    "courthouse/cafeteria",
    "courthouse/press_room",
];

/// Resolver lifecycle. There is no transition back to `Uninitialized`
/// except the test-only reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Uninitialized,
    ManifestLoaded,
    FallbackActive,
}

pub struct ContentResolver {
    base_path: String,
    state: ResolverState,
    registry: Option<Registry>,
    cache: HashMap<String, String>,
}

impl ContentResolver {
    /// Create a resolver rooted at the generated levels directory.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            state: ResolverState::Uninitialized,
            registry: None,
            cache: HashMap::new(),
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Load the registry manifest.
    ///
    /// A missing or corrupt manifest activates the fallback table instead
    /// of failing outright; the degraded state is visible via `state()`.
    pub fn load_manifest(&mut self, path: &Path) -> Result<()> {
        let loaded = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<Registry>(&content).ok());

        match loaded {
            Some(registry) => {
                self.registry = Some(registry);
                self.state = ResolverState::ManifestLoaded;
            }
            None => {
                self.registry = None;
                self.state = ResolverState::FallbackActive;
            }
        }
        Ok(())
    }

    /// The loaded registry, when the manifest was readable.
    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    /// Resolve the artifact path for a level id by convention.
    ///
    /// Lookups are cached after first resolution.
    pub fn resolve_level_path(&mut self, level_id: &str) -> Result<String> {
        if self.state == ResolverState::Uninitialized {
            return Err(KilnError::Validation {
                message: "Resolver is uninitialized".to_string(),
                help: Some("Call load_manifest before resolving levels".to_string()),
            });
        }

        if let Some(path) = self.cache.get(level_id) {
            return Ok(path.clone());
        }

        validate_level_id(level_id)?;

        let known = match &self.registry {
            Some(registry) => registry.has_room(level_id),
            None => FALLBACK_LEVELS.contains(&level_id),
        };
        if !known {
            return Err(KilnError::Validation {
                message: format!("Unknown level id '{}'", level_id),
                help: Some("Compile the level and reassemble the registry".to_string()),
            });
        }

        let path = format!("{}/{}.json", self.base_path.trim_end_matches('/'), level_id);
        self.cache.insert(level_id.to_string(), path.clone());
        Ok(path)
    }

    /// Test-only escape hatch back to `Uninitialized`.
    #[cfg(test)]
    fn reset(&mut self) {
        self.state = ResolverState::Uninitialized;
        self.registry = None;
        self.cache.clear();
    }
}

/// Level ids are lowercase path-shaped identifiers; anything else would let
/// callers smuggle arbitrary filesystem paths through the resolver.
fn validate_level_id(level_id: &str) -> Result<()> {
    let well_formed = !level_id.is_empty()
        && !level_id.starts_with('/')
        && !level_id.ends_with('/')
        && !level_id.split('/').any(|part| part.is_empty() || part == "." || part == "..")
        && level_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._/-".contains(c));

    if well_formed {
        Ok(())
    } else {
        Err(KilnError::Validation {
            message: format!("Invalid level id '{}'", level_id),
            help: Some("Level ids are lowercase [a-z0-9._-] path segments".to_string()),
        })
    }
}
