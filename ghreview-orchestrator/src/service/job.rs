//! Job Service
//!
//! Business logic for assessment submission and the job lifecycle.

use std::time::Duration;

use ghreview_core::domain::job::{Job, JobStatus};
use ghreview_core::dto::job::{CompleteJobRequest, JobExecutionInfo, SubmitAssessment};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::job_repository;

/// Service error type
#[derive(Debug)]
pub enum JobError {
    NotFound(Uuid),
    /// The job exists but is not in a state that allows the operation
    Conflict(String),
    Unauthorized(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for JobError {
    fn from(err: sqlx::Error) -> Self {
        JobError::DatabaseError(err)
    }
}

/// Queue a new assessment
///
/// Nothing is resolved here; the job only records the hints and who asked.
pub async fn submit_assessment(
    pool: &PgPool,
    req: SubmitAssessment,
    requested_by: Option<String>,
    allow_anonymous: bool,
) -> Result<Job, JobError> {
    check_submitter(requested_by.as_deref(), allow_anonymous)?;

    let job = job_repository::create(pool, req.into_request(requested_by)).await?;

    tracing::info!(
        job_id = %job.id,
        requested_by = job.request.requested_by.as_deref().unwrap_or("anonymous"),
        "Assessment queued"
    );

    Ok(job)
}

/// Get a job by ID
pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Job, JobError> {
    let job = job_repository::find_by_id(pool, id)
        .await?
        .ok_or(JobError::NotFound(id))?;

    Ok(job)
}

/// List queued jobs, oldest first
pub async fn list_scheduled_jobs(pool: &PgPool) -> Result<Vec<Job>, JobError> {
    let jobs = job_repository::find_by_status(pool, JobStatus::Queued).await?;
    Ok(jobs)
}

/// Claim a queued job for a worker
pub async fn claim_job(
    pool: &PgPool,
    job_id: Uuid,
    worker_id: &str,
) -> Result<JobExecutionInfo, JobError> {
    validate_worker_id(worker_id)?;

    let Some(job) = job_repository::claim(pool, job_id, worker_id).await? else {
        return Err(explain_rejection(pool, job_id, JobStatus::Started, None).await);
    };

    tracing::info!(
        job_id = %job.id,
        worker_id,
        attempt = job.attempts,
        "Job claimed"
    );

    Ok(JobExecutionInfo {
        job_id: job.id,
        request: job.request,
        attempts: job.attempts,
    })
}

/// Record a started job's terminal outcome
///
/// Terminal jobs are immutable: a second completion, or a late one from a
/// worker whose claim was requeued, is rejected.
pub async fn complete_job(
    pool: &PgPool,
    job_id: Uuid,
    req: CompleteJobRequest,
) -> Result<(), JobError> {
    validate_worker_id(&req.worker_id)?;

    let status = req.outcome.status();
    let Some(job) = job_repository::complete(pool, job_id, &req.worker_id, req.outcome).await?
    else {
        return Err(explain_rejection(pool, job_id, status, Some(&req.worker_id)).await);
    };

    match job.status {
        JobStatus::Failed => tracing::warn!(
            job_id = %job.id,
            worker_id = %req.worker_id,
            error = job.error.as_deref().unwrap_or_default(),
            "Job failed"
        ),
        _ => tracing::info!(job_id = %job.id, worker_id = %req.worker_id, %status, "Job completed"),
    }

    Ok(())
}

/// Return jobs stuck in `started` for longer than `claim_timeout` to the queue
pub async fn requeue_stale_jobs(pool: &PgPool, claim_timeout: Duration) -> Result<usize, JobError> {
    let timeout = chrono::Duration::from_std(claim_timeout)
        .map_err(|e| JobError::ValidationError(format!("Invalid claim timeout: {}", e)))?;
    let cutoff = chrono::Utc::now() - timeout;

    let requeued = job_repository::requeue_started_before(pool, cutoff).await?;
    for id in &requeued {
        tracing::warn!(job_id = %id, "Stale claim returned to queue");
    }

    Ok(requeued.len())
}

/// Turn a failed conditional update into NotFound or Conflict
async fn explain_rejection(
    pool: &PgPool,
    job_id: Uuid,
    target: JobStatus,
    worker_id: Option<&str>,
) -> JobError {
    match job_repository::find_by_id(pool, job_id).await {
        Ok(Some(job)) => rejection(&job, target, worker_id),
        Ok(None) => JobError::NotFound(job_id),
        Err(err) => JobError::DatabaseError(err),
    }
}

/// Describe why `job` could not move to `target`
///
/// A transition the lifecycle allows can only have been refused because the
/// claim belongs to someone else.
fn rejection(job: &Job, target: JobStatus, worker_id: Option<&str>) -> JobError {
    if job.status.can_transition_to(target) && job.worker_id.as_deref() != worker_id {
        return JobError::Conflict(format!(
            "Job {} is held by another worker (current: {})",
            job.id, job.status
        ));
    }

    JobError::Conflict(format!(
        "Job {} cannot move from {} to {}",
        job.id, job.status, target
    ))
}

// =============================================================================
// Validation
// =============================================================================

/// Anonymous submissions are only accepted when the deployment allows them
pub fn check_submitter(requested_by: Option<&str>, allow_anonymous: bool) -> Result<(), JobError> {
    if requested_by.is_none() && !allow_anonymous {
        return Err(JobError::Unauthorized(
            "Authentication required to submit assessments".to_string(),
        ));
    }
    Ok(())
}

fn validate_worker_id(worker_id: &str) -> Result<(), JobError> {
    if worker_id.trim().is_empty() {
        return Err(JobError::ValidationError(
            "worker_id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
