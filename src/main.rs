use clap::Parser;
use miette::Result;
use placer::cli::{Cli, Commands};
use placer::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Init(args) => placer::cli::init::run(args, &printer)?,
        Commands::Plan(args) => placer::cli::plan::run(args, &printer)?,
        Commands::Run(args) => placer::cli::run::run(args, &printer)?,
        Commands::Resume(args) => placer::cli::run::resume(args, &printer)?,
        Commands::Status(args) => placer::cli::status::run(args, &printer)?,
        Commands::Clear(args) => placer::cli::clear::run(args, &printer)?,
        Commands::Completions(args) => placer::cli::completions::run(args)?,
    }

    Ok(())
}
