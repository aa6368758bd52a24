//! kiln - deterministic content build pipeline
//!
//! A library and CLI for compiling authored game assets (tile maps,
//! character specs, image files) into versioned, machine-consumable
//! artifacts: canonical level files and a unified content registry.

pub mod cli;
pub mod config;
pub mod contract;
pub mod diag;
pub mod error;
pub mod fsutil;
pub mod map;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use config::{AssetRoot, Config};
pub use contract::{MapContract, PropertyKind, REQUIRED_LAYERS, TILE_LAYERS};
pub use diag::{Diagnostic, DiagnosticList, Severity};
pub use error::{KilnError, Result};
pub use map::{
    compile_batch, compile_map, discover_maps, validate_map, AuthoredMap, BatchReport, EntityData,
    LevelData, MapSource, PropertyValue, ValidateContext,
};
pub use registry::{assemble, CompiledEntity, Registry, RegistryTemplate};
pub use resolver::{ContentResolver, ResolverState};
pub use scanner::{scan, AssetCandidate, AssetIndex, AssetKind, Compliance};
