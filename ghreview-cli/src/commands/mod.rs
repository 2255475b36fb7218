//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod assessment;
mod job;

pub use assessment::AssessmentCommands;
pub use job::JobCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit and follow assessments
    Assessment {
        #[command(subcommand)]
        command: AssessmentCommands,
    },
    /// Inspect the job queue
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Check that the orchestrator is up
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Assessment { command } => {
            assessment::handle_assessment_command(command, config).await
        }
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Health => check_health(config).await,
    }
}

async fn check_health(config: &Config) -> Result<()> {
    let client = config.client()?;

    if client.health().await? {
        println!("{} {}", "✓".green(), "Orchestrator is healthy".bold());
        Ok(())
    } else {
        anyhow::bail!("Orchestrator at {} is not healthy", client.base_url())
    }
}
