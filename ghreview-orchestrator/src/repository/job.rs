//! Job Repository
//!
//! Handles all database operations related to assessment jobs.
//!
//! Every lifecycle transition is a single conditional `UPDATE ... RETURNING`,
//! so two workers racing on the same row cannot both win.

use chrono::{DateTime, Utc};
use ghreview_core::domain::assessment::{AssessmentRequest, AssessmentResult};
use ghreview_core::domain::job::{Job, JobStatus};
use ghreview_core::dto::job::JobOutcome;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, status, request, created_at, started_at, completed_at, \
                           worker_id, attempts, result, error";

/// Create a new queued job in the database
pub async fn create(pool: &PgPool, request: AssessmentRequest) -> Result<Job, sqlx::Error> {
    let job = Job {
        id: Uuid::new_v4(),
        status: JobStatus::Queued,
        request,
        created_at: Utc::now(),
        started_at: None,
        completed_at: None,
        worker_id: None,
        attempts: 0,
        result: None,
        error: None,
    };

    sqlx::query(
        r#"
        INSERT INTO assessment_jobs (id, status, request, requested_by, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(job.id)
    .bind(JobStatus::Queued.as_str())
    .bind(Json(&job.request))
    .bind(job.request.requested_by.as_deref())
    .bind(job.created_at)
    .execute(pool)
    .await?;

    Ok(job)
}

/// Find a job by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {} FROM assessment_jobs WHERE id = $1",
        JOB_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Job::try_from).transpose()
}

/// Find jobs by status, oldest first
pub async fn find_by_status(pool: &PgPool, status: JobStatus) -> Result<Vec<Job>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {} FROM assessment_jobs WHERE status = $1 ORDER BY created_at ASC",
        JOB_COLUMNS
    ))
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Job::try_from).collect()
}

/// Move a queued job to `started` on behalf of a worker
///
/// Returns `None` when the job does not exist or is not queued.
pub async fn claim(pool: &PgPool, id: Uuid, worker_id: &str) -> Result<Option<Job>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(&format!(
        r#"
        UPDATE assessment_jobs
        SET status = $2, started_at = $3, worker_id = $4, attempts = attempts + 1
        WHERE id = $1 AND status = $5
        RETURNING {}
        "#,
        JOB_COLUMNS
    ))
    .bind(id)
    .bind(JobStatus::Started.as_str())
    .bind(Utc::now())
    .bind(worker_id)
    .bind(JobStatus::Queued.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(Job::try_from).transpose()
}

/// Record the terminal outcome of a job started by `worker_id`
///
/// Returns `None` when the job does not exist, is not `started`, or is held
/// by a different worker.
pub async fn complete(
    pool: &PgPool,
    id: Uuid,
    worker_id: &str,
    outcome: JobOutcome,
) -> Result<Option<Job>, sqlx::Error> {
    let status = outcome.status();
    let (result, error) = match outcome {
        JobOutcome::Finished { result } => (Some(Json(result)), None),
        JobOutcome::Failed { error } => (None, Some(error)),
    };

    let row = sqlx::query_as::<_, JobRow>(&format!(
        r#"
        UPDATE assessment_jobs
        SET status = $2, completed_at = $3, result = $4, error = $5
        WHERE id = $1 AND status = $6 AND worker_id = $7
        RETURNING {}
        "#,
        JOB_COLUMNS
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(result)
    .bind(error)
    .bind(JobStatus::Started.as_str())
    .bind(worker_id)
    .fetch_optional(pool)
    .await?;

    row.map(Job::try_from).transpose()
}

/// Return jobs started before `cutoff` to the queue
///
/// Returns the ids of the requeued jobs.
pub async fn requeue_started_before(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE assessment_jobs
        SET status = $1, started_at = NULL, worker_id = NULL
        WHERE status = $2 AND started_at < $3
        RETURNING id
        "#,
    )
    .bind(JobStatus::Queued.as_str())
    .bind(JobStatus::Started.as_str())
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    status: String,
    request: Json<AssessmentRequest>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    worker_id: Option<String>,
    attempts: i32,
    result: Option<Json<AssessmentResult>>,
    error: Option<String>,
}

impl TryFrom<JobRow> for Job {
    type Error = sqlx::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = JobStatus::parse(&row.status).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown job status '{}'", row.status).into())
        })?;

        Ok(Job {
            id: row.id,
            status,
            request: row.request.0,
            created_at: row.created_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            worker_id: row.worker_id,
            attempts: row.attempts,
            result: row.result.map(|json| json.0),
            error: row.error,
        })
    }
}
