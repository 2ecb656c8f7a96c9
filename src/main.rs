mod cli;
mod commands;
mod infra;
mod shared;
mod version;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { command } = Cli::parse();

    match command {
        Commands::Install(args) => commands::install::run(&args)?,
        Commands::Hook(args) => commands::hook::run(&args)?,
        Commands::Test(args) => commands::test_push::run(&args)?,
        Commands::Doctor(args) => commands::doctor::run(&args)?,
    }

    Ok(())
}
