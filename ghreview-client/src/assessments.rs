//! Assessment endpoints used by callers

use crate::OrchestratorClient;
use crate::error::Result;
use ghreview_core::dto::job::{AssessmentStatus, SubmitAssessment};
use serde::Deserialize;
use uuid::Uuid;

/// Header the orchestrator reads the submitter's username from
pub const USERNAME_HEADER: &str = "X-Jwt-Username";

#[derive(Debug, Deserialize)]
struct Health {
    status: String,
}

impl OrchestratorClient {
    /// Submit a new assessment
    ///
    /// # Arguments
    /// * `req` - Username and/or email to assess
    /// * `requested_by` - Submitter identity, forwarded as `X-Jwt-Username`
    ///
    /// # Returns
    /// The queued job's id and status
    pub async fn submit_assessment(
        &self,
        req: SubmitAssessment,
        requested_by: Option<&str>,
    ) -> Result<AssessmentStatus> {
        let url = format!("{}/api/assessments", self.base_url);
        let mut request = self.client.post(&url).json(&req);
        if let Some(requested_by) = requested_by {
            request = request.header(USERNAME_HEADER, requested_by);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Get the status of an assessment, with its result or error once terminal
    pub async fn get_assessment(&self, job_id: Uuid) -> Result<AssessmentStatus> {
        let url = format!("{}/api/assessments/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check whether the orchestrator is up
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/api/status", self.base_url);
        let response = self.client.get(&url).send().await?;

        let health: Health = self.handle_response(response).await?;
        Ok(health.status == "ok")
    }
}
