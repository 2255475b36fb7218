//! Job lifecycle endpoints used by workers

use crate::OrchestratorClient;
use crate::error::Result;
use ghreview_core::domain::job::Job;
use ghreview_core::dto::job::{ClaimJobRequest, CompleteJobRequest, JobExecutionInfo, JobOutcome};
use uuid::Uuid;

impl OrchestratorClient {
    /// List all queued jobs, oldest first
    pub async fn list_scheduled_jobs(&self) -> Result<Vec<Job>> {
        let url = format!("{}/api/jobs/scheduled", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Claim a queued job for execution
    ///
    /// Fails with a 409 [`crate::ClientError::ApiError`] when another worker
    /// claimed it first.
    pub async fn claim_job(&self, job_id: Uuid, worker_id: &str) -> Result<JobExecutionInfo> {
        let url = format!("{}/api/jobs/{}/claim", self.base_url, job_id);
        tracing::debug!("Claiming job {} as {}", job_id, worker_id);
        let response = self
            .client
            .post(&url)
            .json(&ClaimJobRequest {
                worker_id: worker_id.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Record a claimed job's terminal outcome
    pub async fn complete_job(
        &self,
        job_id: Uuid,
        worker_id: &str,
        outcome: JobOutcome,
    ) -> Result<()> {
        let url = format!("{}/api/jobs/{}/complete", self.base_url, job_id);
        tracing::debug!("Reporting job {} as {}", job_id, outcome.status());
        let response = self
            .client
            .post(&url)
            .json(&CompleteJobRequest {
                worker_id: worker_id.to_string(),
                outcome,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
