//! Health Check API Handler

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
}

/// GET /api/status
/// Health check endpoint
pub async fn health_check() -> Json<Health> {
    Json(Health { status: "ok" })
}
