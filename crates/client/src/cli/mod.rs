//! CLI command definitions.

pub mod plays;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI client for the squiggle play API.
#[derive(Debug, Parser)]
#[command(name = "squiggle-client")]
#[command(about = "CLI client for the squiggle play API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "SQUIGGLE_URL", default_value = crate::client::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play management.
    Plays(plays::PlaysCommand),
    /// Server liveness check.
    Health,
}
