//! ghreview CLI
//!
//! Command-line interface for submitting GitHub profile assessments and
//! following their progress through the orchestrator.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "ghreview")]
#[command(about = "GitHub profile assessment CLI", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(
        long,
        env = "GH_REVIEW_ORCHESTRATOR_URL",
        default_value = "http://localhost:8080"
    )]
    orchestrator_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        orchestrator_url: cli.orchestrator_url,
        request_timeout: Duration::from_secs(cli.timeout),
    };

    handle_command(cli.command, &config).await
}
