//! Assessment command handlers
//!
//! Submit assessments, look up their status and block until they finish.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use ghreview_client::OrchestratorClient;
use ghreview_core::domain::assessment::{AssessmentResult, RepositorySample};
use ghreview_core::domain::job::JobStatus;
use ghreview_core::dto::job::{AssessmentStatus, SubmitAssessment};
use uuid::Uuid;

use crate::commands::job::describe_target;
use crate::config::Config;

/// Assessment subcommands
#[derive(Subcommand)]
pub enum AssessmentCommands {
    /// Queue a new assessment
    Submit {
        /// GitHub username to assess
        #[arg(short, long)]
        username: Option<String>,

        /// Email used to find the account when the username is unknown
        #[arg(short, long)]
        email: Option<String>,

        /// Identity recorded as the requester
        #[arg(long = "as", env = "GH_REVIEW_REQUESTED_BY")]
        requested_by: Option<String>,

        /// Wait for the assessment to finish
        #[arg(short, long)]
        wait: bool,
    },
    /// Show the current status of an assessment
    Status {
        /// Job ID
        id: Uuid,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Poll an assessment until it finishes or fails
    Wait {
        /// Job ID
        id: Uuid,

        /// Seconds between polls
        #[arg(short, long, default_value_t = 2)]
        interval: u64,

        /// Give up after this many seconds
        #[arg(short, long, default_value_t = 600)]
        timeout: u64,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
}

/// Handle assessment commands
pub async fn handle_assessment_command(command: AssessmentCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        AssessmentCommands::Submit {
            username,
            email,
            requested_by,
            wait,
        } => {
            let id = submit(&client, username, email, requested_by).await?;
            if wait {
                println!();
                let status =
                    wait_for(&client, id, Duration::from_secs(2), Duration::from_secs(600)).await?;
                print_status(&status);
            }
            Ok(())
        }
        AssessmentCommands::Status { id, json } => {
            let status = client
                .get_assessment(id)
                .await
                .with_context(|| format!("Failed to fetch assessment {}", id))?;
            render(&status, json)
        }
        AssessmentCommands::Wait {
            id,
            interval,
            timeout,
            json,
        } => {
            let status = wait_for(
                &client,
                id,
                Duration::from_secs(interval.max(1)),
                Duration::from_secs(timeout),
            )
            .await?;
            render(&status, json)
        }
    }
}

async fn submit(
    client: &OrchestratorClient,
    username: Option<String>,
    email: Option<String>,
    requested_by: Option<String>,
) -> Result<Uuid> {
    if username.is_none() && email.is_none() {
        bail!("Provide --username or --email");
    }

    let target = describe_target(username.as_deref(), email.as_deref());
    let status = client
        .submit_assessment(
            SubmitAssessment {
                github_username: username,
                email,
            },
            requested_by.as_deref(),
        )
        .await
        .context("Failed to submit assessment")?;

    println!("{} Assessment queued for {}", "✓".green(), target.bold());
    println!("  Job ID: {}", status.job_id.to_string().cyan());
    println!("  Status: {}", colorize_status(status.status));

    Ok(status.job_id)
}

async fn wait_for(
    client: &OrchestratorClient,
    id: Uuid,
    interval: Duration,
    timeout: Duration,
) -> Result<AssessmentStatus> {
    let started = Instant::now();
    let mut last = None;

    loop {
        let status = client.get_assessment(id).await?;

        if last != Some(status.status) {
            eprintln!("  {} {}", "…".dimmed(), colorize_status(status.status));
            last = Some(status.status);
        }

        if status.status.is_terminal() {
            return Ok(status);
        }

        if started.elapsed() >= timeout {
            bail!(
                "Assessment {} still {} after {}s",
                id,
                status.status,
                timeout.as_secs()
            );
        }

        tokio::time::sleep(interval).await;
    }
}

fn render(status: &AssessmentStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else {
        print_status(status);
    }
    Ok(())
}

/// Print assessment status, with the report once finished
fn print_status(status: &AssessmentStatus) {
    println!("{}", "Assessment:".bold());
    println!("  ID:     {}", status.job_id.to_string().cyan());
    println!("  Status: {}", colorize_status(status.status));

    if let Some(error) = &status.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if let Some(result) = &status.result {
        print_result(result);
    }
}

fn print_result(result: &AssessmentResult) {
    let login = result.user.login().unwrap_or("<unknown>");
    println!("  User:   {}", login.bold());
    if let Some(requested_by) = &result.requested_by {
        println!("  By:     {}", requested_by.dimmed());
    }

    println!(
        "\n{}",
        format!("Repositories ({}):", result.repositories.len()).bold()
    );
    for sample in &result.repositories {
        print_sample(sample);
    }

    println!("\n{}", "Summary:".bold());
    println!("{}", result.summary);
}

fn print_sample(sample: &RepositorySample) {
    let repo = &sample.repository;
    println!(
        "  {} {} {}",
        "▸".cyan(),
        repo.full_name,
        format!("★ {}", repo.star_count).yellow()
    );
    if let Some(language) = &repo.primary_language {
        println!("    Language: {}", language);
    }
    println!(
        "    README:   {}",
        if sample.readme.is_some() {
            "✓".green()
        } else {
            "✗".dimmed()
        }
    );
    if !sample.sampled_files.is_empty() {
        let files: Vec<_> = sample.sampled_files.iter().map(|f| f.path.as_str()).collect();
        println!("    Files:    {}", files.join(", ").dimmed());
    }
}

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::Started => status_str.cyan(),
        JobStatus::Finished => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
