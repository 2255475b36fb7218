//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod assessment;
pub mod error;
pub mod health;
pub mod job;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Accept submissions without an identity header
    pub allow_anonymous: bool,
}

impl AppState {
    pub fn new(pool: PgPool, allow_anonymous: bool) -> Self {
        Self {
            pool,
            allow_anonymous,
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/status", get(health::health_check))
        // Assessment endpoints
        .route("/api/assessments", post(assessment::submit_assessment))
        .route("/api/assessments/{id}", get(assessment::get_assessment))
        // Worker endpoints
        .route("/api/jobs/scheduled", get(job::list_scheduled_jobs))
        .route("/api/jobs/{id}/claim", post(job::claim_job))
        .route("/api/jobs/{id}/complete", post(job::complete_job))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
