//! Job poller
//!
//! Polls the orchestrator for scheduled jobs and executes them.
//! Parallelism is bounded by a semaphore; jobs that find no free permit stay
//! queued for the next cycle or another worker.

use anyhow::{Context, Result};
use ghreview_client::{ClientError, OrchestratorClient};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::service::ExecutionService;

/// What happened to a job this worker tried to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRun {
    /// Claimed, executed and reported
    Completed,
    /// Another worker claimed it first
    Skipped,
}

/// Job poller that continuously polls for and executes jobs
pub struct JobPoller {
    config: Config,
    client: Arc<OrchestratorClient>,
    execution: Arc<dyn ExecutionService>,
    semaphore: Arc<Semaphore>,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(
        config: Config,
        client: Arc<OrchestratorClient>,
        execution: Arc<dyn ExecutionService>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_parallel_jobs));
        Self {
            config,
            client,
            execution,
            semaphore,
        }
    }

    /// Starts the polling loop
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting job poller (interval: {:?}, max parallel jobs: {})",
            self.config.poll_interval, self.config.max_parallel_jobs
        );

        let mut interval = time::interval(self.config.poll_interval);

        loop {
            interval.tick().await;

            debug!("Polling for scheduled jobs");

            match self.poll_and_execute_once().await {
                Ok(completed) => {
                    if completed > 0 {
                        info!("Completed {} job(s) this cycle", completed);
                    }
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                }
            }
        }
    }

    /// Performs a single poll cycle
    ///
    /// Returns the number of jobs this worker completed.
    pub async fn poll_and_execute_once(&self) -> Result<usize> {
        let jobs = self
            .client
            .list_scheduled_jobs()
            .await
            .context("Failed to fetch scheduled jobs")?;

        if jobs.is_empty() {
            debug!("No jobs available");
            return Ok(0);
        }

        info!("Found {} queued job(s)", jobs.len());

        let mut handles = Vec::new();

        for job in jobs {
            // Try to acquire semaphore permit, skip if at max capacity
            if let Ok(permit) = Arc::clone(&self.semaphore).try_acquire_owned() {
                handles.push(self.spawn_job_task(job.id, permit));
            } else {
                debug!("Max parallel jobs reached, leaving job {} queued", job.id);
            }
        }

        let mut completed = 0;
        for handle in handles {
            match handle.await {
                Ok(JobRun::Completed) => completed += 1,
                Ok(JobRun::Skipped) => {}
                Err(e) => warn!("Job task panicked: {}", e),
            }
        }

        Ok(completed)
    }

    /// Spawns a task to execute a single job
    fn spawn_job_task(
        &self,
        job_id: Uuid,
        permit: OwnedSemaphorePermit,
    ) -> tokio::task::JoinHandle<JobRun> {
        let client = Arc::clone(&self.client);
        let execution = Arc::clone(&self.execution);
        let worker_id = self.config.worker_id.clone();

        tokio::spawn(async move {
            let run = match Self::execute_job(job_id, &worker_id, &client, execution.as_ref()).await
            {
                Ok(run) => run,
                Err(e) => {
                    error!("Failed to execute job {}: {:#}", job_id, e);
                    JobRun::Skipped
                }
            };
            // Permit is released when the task ends
            drop(permit);
            run
        })
    }

    /// Claims, executes and reports a single job
    async fn execute_job(
        job_id: Uuid,
        worker_id: &str,
        client: &OrchestratorClient,
        execution: &dyn ExecutionService,
    ) -> Result<JobRun> {
        let exec_info = match client.claim_job(job_id, worker_id).await {
            Ok(info) => info,
            Err(e) if is_lost_race(&e) => {
                debug!("Job {} was claimed elsewhere: {}", job_id, e);
                return Ok(JobRun::Skipped);
            }
            Err(e) => return Err(e).context("Failed to claim job"),
        };

        info!("Claimed job {} (attempt {})", job_id, exec_info.attempts);

        let outcome = execution.execute(job_id, &exec_info.request).await;
        let status = outcome.status();

        match client.complete_job(job_id, worker_id, outcome).await {
            Ok(()) => {
                info!("Job {} reported as {}", job_id, status);
                Ok(JobRun::Completed)
            }
            // The claim went stale and was redelivered; the other attempt owns the job now
            Err(e) if e.is_conflict() => {
                warn!("Completion for job {} was rejected: {}", job_id, e);
                Ok(JobRun::Skipped)
            }
            Err(e) => Err(e).context("Failed to complete job"),
        }
    }
}

/// The job left the queue between listing and claiming
fn is_lost_race(err: &ClientError) -> bool {
    err.is_conflict() || err.is_not_found()
}
