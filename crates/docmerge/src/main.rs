mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { json } => commands::inspect::run(json, cli.verbose),
        Commands::Generate { dry_run, pdf } => commands::generate::run(dry_run, pdf, cli.verbose),
        Commands::Convert => commands::convert::run(cli.verbose),
        Commands::Doctor { json } => commands::doctor::run(json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
