//! Scan command implementation.
//!
//! Walks the asset roots, writes the accepted index and the quarantine
//! list, and prints a pass/fail summary. Quarantined assets are surfaced
//! for follow-up but never fail the command; only fatal conditions (bad
//! root, duplicate id) exit non-zero.

use std::path::PathBuf;

use clap::Args;

use crate::config::{AssetRoot, Config};
use crate::error::{KilnError, Result};
use crate::output::{display_path, plural, summary, Printer};
use crate::scanner::scan;

/// Scan asset roots into an accepted index and a quarantine list
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Project config file
    #[arg(long, short, default_value = "kiln.yaml")]
    pub config: PathBuf,

    /// Asset roots to scan (overrides the config)
    pub roots: Vec<PathBuf>,

    /// Output directory for the index files
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ScanArgs, printer: &Printer) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    if !args.roots.is_empty() {
        config.asset_roots = args.roots.iter().map(AssetRoot::new).collect();
    }
    if config.asset_roots.is_empty() {
        return Err(KilnError::Build {
            message: "No asset roots configured".to_string(),
            help: Some("List asset_roots in kiln.yaml or pass directories".to_string()),
        });
    }

    for root in &config.asset_roots {
        printer.status("Scanning", &display_path(&root.path));
    }

    let index = scan(&config)?;

    for candidate in &index.quarantined {
        printer.warning(
            "Quarantined",
            &format!("{} ({})", candidate.id, candidate.notes.join("; ")),
        );
    }

    let out_dir = args.output.unwrap_or_else(|| config.generated.clone());
    let (index_path, quarantine_path) = index.write(&out_dir)?;

    printer.status(
        "Wrote",
        &format!(
            "{} ({})",
            display_path(&index_path),
            plural(index.passing.len(), "asset", "assets")
        ),
    );
    printer.status(
        "Wrote",
        &format!(
            "{} ({})",
            display_path(&quarantine_path),
            plural(index.quarantined.len(), "asset", "assets")
        ),
    );

    summary("scan", index.passing.len(), index.quarantined.len());
    Ok(())
}
