//! ghreview Worker
//!
//! A stateless worker that executes queued assessment jobs.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Services: Run a request through the assessment engine
//! - Scheduler: Job polling and lifecycle management
//!
//! The worker polls the orchestrator for queued jobs, claims one, runs the
//! assessment pipeline and reports the result or the failure message.

mod config;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::scheduler::JobPoller;
use crate::service::{EngineExecutionService, ExecutionService};
use ghreview_client::OrchestratorClient;
use ghreview_engine::AssessmentEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghreview_worker=info,ghreview_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ghreview Worker");

    // Load configuration
    let config = Config::from_env();
    config.validate().context("Invalid worker configuration")?;
    info!(
        "Loaded configuration: worker_id={}, orchestrator_url={}",
        config.worker_id, config.orchestrator_url
    );

    if config.engine.openai_api_key.is_none() {
        warn!("No OpenAI key configured; every assessment will fail");
    }

    // Initialize orchestrator client
    let client = Arc::new(OrchestratorClient::new(config.orchestrator_url.clone()));

    // Wait for the orchestrator (with retry logic)
    wait_for_orchestrator(&client).await?;
    info!("Orchestrator is reachable");

    let engine = AssessmentEngine::from_config(&config.engine)
        .context("Failed to build assessment engine")?;
    let execution_service: Arc<dyn ExecutionService> =
        Arc::new(EngineExecutionService::new(engine));

    info!(
        "Engine initialized: max_repos={}, max_files_per_repo={}, max_chars_per_file={}, repo_concurrency={}",
        config.engine.max_repos,
        config.engine.max_files_per_repo,
        config.engine.max_chars_per_file,
        config.engine.repo_concurrency
    );

    // Create job poller
    let poller = JobPoller::new(config, client, execution_service);

    // Start polling loop
    info!("Starting job polling loop");
    if let Err(e) = poller.run().await {
        error!("Poller error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Check orchestrator health with retry logic and exponential backoff
///
/// This handles the case where the orchestrator may not be ready yet when
/// the worker starts (common in container environments).
async fn wait_for_orchestrator(client: &OrchestratorClient) -> Result<()> {
    const MAX_RETRIES: u32 = 10;
    const INITIAL_DELAY_MS: u64 = 500;
    const MAX_DELAY_MS: u64 = 30_000;

    let mut attempt = 0;
    let mut delay_ms = INITIAL_DELAY_MS;

    loop {
        attempt += 1;

        let failure = match client.health().await {
            Ok(true) => {
                if attempt > 1 {
                    info!(
                        "Reached orchestrator after {} attempt(s)",
                        attempt
                    );
                }
                return Ok(());
            }
            Ok(false) => "orchestrator reported unhealthy".to_string(),
            Err(e) => e.to_string(),
        };

        if attempt >= MAX_RETRIES {
            error!("Failed to reach orchestrator after {} attempts", MAX_RETRIES);
            anyhow::bail!("Orchestrator is unreachable: {}", failure);
        }

        warn!(
            "Orchestrator not ready (attempt {}/{}): {}",
            attempt, MAX_RETRIES, failure
        );
        warn!("Retrying in {} ms...", delay_ms);

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        // Exponential backoff with cap
        delay_ms = (delay_ms * 2).min(MAX_DELAY_MS);
    }
}
