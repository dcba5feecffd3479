//! Metamigrate CLI - copy analytics collections between server instances

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{export, flush, migrate};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Export(args) => export::execute(args, &cli.global),
        cli::Commands::Flush(args) => flush::execute(args, &cli.global),
    }
}
