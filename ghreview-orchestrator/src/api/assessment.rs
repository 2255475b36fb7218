//! Assessment API Handlers
//!
//! Submission and status endpoints used by callers.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use ghreview_core::dto::job::{AssessmentStatus, SubmitAssessment};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult, JOB_NOT_FOUND};
use crate::service::job_service;

/// Identity headers set by the authenticating proxy, in precedence order
pub const IDENTITY_HEADERS: [&str; 3] = ["x-jwt-username", "x-jwt-email", "x-jwt-sub"];

/// POST /api/assessments
/// Queue an assessment and return immediately
pub async fn submit_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitAssessment>,
) -> ApiResult<Json<AssessmentStatus>> {
    let requested_by = requested_by(&headers);

    let job =
        job_service::submit_assessment(&state.pool, req, requested_by, state.allow_anonymous)
            .await?;

    Ok(Json(AssessmentStatus::from(job)))
}

/// GET /api/assessments/{id}
/// Get the status of an assessment with its result or error once terminal
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssessmentStatus>> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(JOB_NOT_FOUND.to_string()))?;
    tracing::debug!("Getting assessment: {}", id);

    let job = job_service::get_job(&state.pool, id).await?;

    Ok(Json(AssessmentStatus::from(job)))
}

/// First non-blank identity header
pub fn requested_by(headers: &HeaderMap) -> Option<String> {
    IDENTITY_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}
