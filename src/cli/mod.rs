pub mod assemble;
pub mod compile;
pub mod completions;
pub mod init;
pub mod scan;
pub mod validate;

use clap::{Parser, Subcommand};

/// kiln - content build pipeline for authored game assets
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan asset roots into an accepted index and a quarantine list
    Scan(scan::ScanArgs),

    /// Validate authored maps against the contract without compiling
    Validate(validate::ValidateArgs),

    /// Compile authored maps into canonical level files
    Compile(compile::CompileArgs),

    /// Assemble the content registry from compiled artifacts
    Assemble(assemble::AssembleArgs),

    /// Initialize a kiln project (generates kiln.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
