//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Metamigrate - copy analytics collections between server instances
#[derive(Parser, Debug)]
#[command(name = "mm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (per-request logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy a source collection (dashboards, cards, references) to the destination
    Migrate(MigrateArgs),

    /// Download native-SQL card queries into per-collection folders
    Export(ExportArgs),

    /// Delete every card on the destination instance
    Flush(FlushArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Configuration file with source/destination credentials
    #[arg(short = 'c', long)]
    pub configuration: PathBuf,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Configuration file with source/destination credentials
    #[arg(short = 'c', long)]
    pub configuration: PathBuf,

    /// Directory to save .sql files into
    #[arg(short, long, default_value = "analytics_export")]
    pub out: PathBuf,
}

/// Arguments for the flush command
#[derive(Args, Debug)]
pub struct FlushArgs {
    /// Configuration file with source/destination credentials
    #[arg(short = 'c', long)]
    pub configuration: PathBuf,

    /// Actually delete; without this flag the command only reports
    #[arg(long)]
    pub yes: bool,
}
