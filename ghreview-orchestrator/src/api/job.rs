//! Job API Handlers
//!
//! Endpoints workers use to pick up and finish jobs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use ghreview_core::domain::job::Job;
use ghreview_core::dto::job::{ClaimJobRequest, CompleteJobRequest, JobExecutionInfo};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::job_service;

/// GET /api/jobs/scheduled
/// List all queued jobs, oldest first
pub async fn list_scheduled_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Job>>> {
    tracing::debug!("Listing scheduled jobs");

    let jobs = job_service::list_scheduled_jobs(&state.pool).await?;

    Ok(Json(jobs))
}

/// POST /api/jobs/{id}/claim
/// Atomically move a queued job to started for the calling worker
pub async fn claim_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClaimJobRequest>,
) -> ApiResult<Json<JobExecutionInfo>> {
    tracing::debug!("Worker {} claiming job: {}", req.worker_id, id);

    let info = job_service::claim_job(&state.pool, id, &req.worker_id).await?;

    Ok(Json(info))
}

/// POST /api/jobs/{id}/complete
/// Record the terminal outcome of a started job
pub async fn complete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteJobRequest>,
) -> ApiResult<StatusCode> {
    tracing::debug!(
        "Worker {} completing job: {} with status {}",
        req.worker_id,
        id,
        req.outcome.status()
    );

    job_service::complete_job(&state.pool, id, req).await?;

    Ok(StatusCode::NO_CONTENT)
}
