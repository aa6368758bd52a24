//! Validate command implementation.
//!
//! Runs the contract gate over authored maps without compiling anything,
//! plus the optional append-only diff against a previous contract
//! snapshot. All checks run on every map; the full error set is printed
//! before the command exits non-zero.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::contract::MapContract;
use crate::error::{KilnError, Result};
use crate::map::{discover_maps, validate_map, AuthoredMap, MapSource, ValidateContext};
use crate::output::{plural, summary, Printer};

/// Validate authored maps against the contract without compiling
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project config file
    #[arg(long, short, default_value = "kiln.yaml")]
    pub config: PathBuf,

    /// Map files to validate (default: discover from config room roots)
    pub maps: Vec<PathBuf>,

    /// Contract document (overrides the config)
    #[arg(long)]
    pub contract: Option<PathBuf>,

    /// Previous contract snapshot for the append-only identity diff
    #[arg(long)]
    pub previous: Option<PathBuf>,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;

    let contract_path = args.contract.unwrap_or_else(|| config.contract.clone());
    let contract = MapContract::load(&contract_path)?;

    let mut contract_errors = 0;
    if let Some(previous_path) = &args.previous {
        let previous = MapContract::load(previous_path)?;
        let diff = contract.diff_previous(&previous);
        contract_errors = diff.error_count();
        for diagnostic in diff.iter() {
            printer.diagnostic(diagnostic);
        }
    }

    let sources = if args.maps.is_empty() {
        discover_maps(&config.room_roots)?
    } else {
        args.maps
            .iter()
            .map(|path| MapSource {
                path: path.clone(),
                level_id: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string()),
            })
            .collect()
    };

    let ctx = ValidateContext {
        search_roots: config.asset_roots.iter().map(|r| r.path.clone()).collect(),
        atlas_base: contract_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };

    let mut failed = 0;
    for source in &sources {
        let map = AuthoredMap::load(&source.path)?;
        let diagnostics = validate_map(&map, &source.level_id, &contract, &ctx);
        if diagnostics.has_errors() {
            failed += 1;
            printer.error("Failed", &source.level_id);
            for diagnostic in diagnostics.iter() {
                printer.diagnostic(diagnostic);
            }
        } else {
            printer.status("Validated", &source.level_id);
        }
    }

    summary("validate", sources.len() - failed, failed + contract_errors);

    if failed > 0 || contract_errors > 0 {
        return Err(KilnError::Validation {
            message: format!(
                "{} of {} failed validation",
                plural(failed, "map", "maps"),
                sources.len()
            ),
            help: None,
        });
    }
    Ok(())
}
