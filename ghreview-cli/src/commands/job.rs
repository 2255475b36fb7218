//! Job command handlers
//!
//! Read-only view of the queue as workers see it.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use ghreview_core::domain::job::Job;

use crate::commands::assessment::colorize_status;
use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List queued jobs, oldest first
    Scheduled,
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        JobCommands::Scheduled => {
            let jobs = client.list_scheduled_jobs().await?;

            if jobs.is_empty() {
                println!("{}", "No scheduled jobs found.".yellow());
            } else {
                println!(
                    "{}",
                    format!("Found {} scheduled job(s):", jobs.len()).bold()
                );
                println!();
                for job in jobs {
                    print_job_summary(&job);
                }
            }

            Ok(())
        }
    }
}

/// Print a job summary from a full Job object
fn print_job_summary(job: &Job) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    println!("    Status:    {}", colorize_status(job.status));
    println!(
        "    Target:    {}",
        describe_target(job.request.username(), job.request.email())
    );
    if let Some(requested_by) = &job.request.requested_by {
        println!("    Requested: {}", requested_by.dimmed());
    }
    println!(
        "    Created:   {}",
        job.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if job.attempts > 0 {
        println!("    Attempts:  {}", job.attempts);
    }
    println!();
}

/// Human-readable form of the lookup hints
pub fn describe_target(username: Option<&str>, email: Option<&str>) -> String {
    match (username, email) {
        (Some(username), Some(email)) => format!("{} ({})", username, email),
        (Some(username), None) => username.to_string(),
        (None, Some(email)) => email.to_string(),
        (None, None) => "<no username or email>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_target() {
        assert_eq!(describe_target(Some("octocat"), None), "octocat");
        assert_eq!(describe_target(None, Some("a@b.com")), "a@b.com");
        assert_eq!(
            describe_target(Some("octocat"), Some("a@b.com")),
            "octocat (a@b.com)"
        );
        assert_eq!(describe_target(None, None), "<no username or email>");
    }
}
