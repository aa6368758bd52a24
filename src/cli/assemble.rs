//! Assemble command implementation.
//!
//! The final merge step: base template + compiled characters + compiled
//! level ids → one registry document, written whole and atomically.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Args;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::fsutil::write_json_atomic;
use crate::output::{display_path, plural, summary, Printer};
use crate::registry::{assemble, CompiledEntity, RegistryTemplate};

/// Assemble the content registry from compiled artifacts
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Project config file
    #[arg(long, short, default_value = "kiln.yaml")]
    pub config: PathBuf,

    /// Build identifier (default: $KILN_BUILD_ID, then epoch seconds)
    #[arg(long)]
    pub build_id: Option<String>,

    /// Compiled characters directory (overrides the config)
    #[arg(long)]
    pub characters: Option<PathBuf>,

    /// Output path for the registry document
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: AssembleArgs, printer: &Printer) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;

    let template = RegistryTemplate::load_or_default(&config.template)?;
    let characters_dir = args.characters.unwrap_or_else(|| config.characters.clone());
    let entities = CompiledEntity::load_dir(&characters_dir)?;
    let rooms = compiled_rooms(&config.levels_dir());
    let build_id = resolve_build_id(args.build_id);

    let registry = assemble(&template, &entities, &rooms, &build_id);

    let out_path = args.output.unwrap_or_else(|| config.registry_path());
    write_json_atomic(&out_path, &registry)?;

    printer.status(
        "Assembled",
        &format!(
            "{} ({}, {}, build {})",
            display_path(&out_path),
            plural(registry.characters.len(), "character", "characters"),
            plural(registry.rooms.len(), "room", "rooms"),
            registry.build_id
        ),
    );
    summary("assemble", 1, 0);
    Ok(())
}

/// The one deliberately non-deterministic input: CI supplies a commit SHA
/// via the environment, local runs fall back to a timestamp.
fn resolve_build_id(explicit: Option<String>) -> String {
    if let Some(id) = explicit {
        return id;
    }
    if let Ok(id) = std::env::var("KILN_BUILD_ID") {
        if !id.is_empty() {
            return id;
        }
    }
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("dev-{}", epoch)
}

/// Level ids of every compiled level under the levels directory, sorted.
fn compiled_rooms(levels_dir: &Path) -> Vec<String> {
    let mut rooms = Vec::new();
    if !levels_dir.is_dir() {
        return rooms;
    }

    for entry in WalkDir::new(levels_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let relative = path.strip_prefix(levels_dir).unwrap_or(path);
        rooms.push(
            relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/"),
        );
    }

    rooms.sort();
    rooms
}
