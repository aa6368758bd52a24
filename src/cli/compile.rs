//! Compile command implementation.
//!
//! Discovers authored maps, gates each on contract validation, compiles
//! the survivors on a bounded worker pool, and reports every failure at
//! the end. The process exits non-zero if any map failed.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::contract::MapContract;
use crate::error::{KilnError, Result};
use crate::map::{compile_batch, discover_maps, ValidateContext};
use crate::output::{display_path, plural, summary, Printer};

/// Compile authored maps into canonical level files
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Project config file
    #[arg(long, short, default_value = "kiln.yaml")]
    pub config: PathBuf,

    /// Output directory for compiled levels
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Worker pool size (default: one per core)
    #[arg(long, short)]
    pub jobs: Option<usize>,

    /// Hard wall-clock limit; the process exits non-zero when exceeded
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

pub fn run(args: CompileArgs, printer: &Printer) -> Result<()> {
    if let Some(secs) = args.timeout_secs {
        spawn_watchdog(secs);
    }

    let config = Config::load_or_default(&args.config)?;
    let contract = MapContract::load(&config.contract)?;
    let sources = discover_maps(&config.room_roots)?;

    let ctx = ValidateContext {
        search_roots: config.asset_roots.iter().map(|r| r.path.clone()).collect(),
        atlas_base: config
            .contract
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };
    let out_dir = args.output.unwrap_or_else(|| config.levels_dir());

    let report = match args.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| KilnError::Build {
                    message: format!("Failed to build worker pool: {}", e),
                    help: None,
                })?;
            pool.install(|| compile_batch(&sources, &contract, &ctx, &out_dir))?
        }
        None => compile_batch(&sources, &contract, &ctx, &out_dir)?,
    };

    for (level_id, path) in &report.written {
        printer.status("Compiled", &format!("{} -> {}", level_id, display_path(path)));
    }
    for (level_id, diagnostics) in &report.validation_failures {
        printer.error("Invalid", level_id);
        for diagnostic in diagnostics.iter() {
            printer.diagnostic(diagnostic);
        }
    }
    for (level_id, message) in &report.compile_failures {
        printer.error("Failed", &format!("{}: {}", level_id, message));
    }

    summary("compile", report.written.len(), report.failure_count());

    if report.has_failures() {
        return Err(KilnError::Build {
            message: format!(
                "{} of {} failed to compile",
                plural(report.failure_count(), "map", "maps"),
                sources.len()
            ),
            help: None,
        });
    }
    Ok(())
}

/// CI guard: a run that outlives the limit is treated as failed. Atomic
/// rename discipline means a killed run never leaves partial artifacts.
fn spawn_watchdog(secs: u64) {
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_secs(secs));
        eprintln!("kiln: compile timed out after {}s", secs);
        std::process::exit(124);
    });
}
