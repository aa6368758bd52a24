use clap::Parser;
use kiln::cli::{Cli, Commands};
use kiln::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Scan(args) => kiln::cli::scan::run(args, &printer)?,
        Commands::Validate(args) => kiln::cli::validate::run(args, &printer)?,
        Commands::Compile(args) => kiln::cli::compile::run(args, &printer)?,
        Commands::Assemble(args) => kiln::cli::assemble::run(args, &printer)?,
        Commands::Init(args) => kiln::cli::init::run(args, &printer)?,
        Commands::Completions(args) => kiln::cli::completions::run(args)?,
    }

    Ok(())
}
