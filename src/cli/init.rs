//! Init command implementation.
//!
//! Generates a starter `kiln.yaml` with the conventional project layout.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::CONFIG_FILENAME;
use crate::error::{KilnError, Result};
use crate::output::Printer;

/// Initialize a kiln project by generating a kiln.yaml config
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing kiln.yaml
    #[arg(long)]
    pub force: bool,
}

const STARTER_CONFIG: &str = "\
asset_roots:
  - path: content/assets
    license: CC-BY-SA 3.0
room_roots:
  - content/rooms
contract: content/contract.json
template: content/registry.base.json
generated: public/generated
characters: public/generated/characters
portrait_size: [256, 256]
";

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(KilnError::Build {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&config_path, STARTER_CONFIG).map_err(|e| KilnError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.status("Created", CONFIG_FILENAME);
    Ok(())
}
