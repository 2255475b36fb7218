//! Job DTOs for inter-service communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::assessment::{AssessmentRequest, AssessmentResult};
use crate::domain::job::{Job, JobStatus};

/// Body of a submission
///
/// `requested_by` is never taken from the body; the orchestrator derives it
/// from the authenticated identity headers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitAssessment {
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SubmitAssessment {
    pub fn into_request(self, requested_by: Option<String>) -> AssessmentRequest {
        AssessmentRequest {
            github_username: self.github_username,
            email: self.email,
            requested_by,
        }
    }
}

/// Status of a job as reported to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentStatus {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AssessmentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for AssessmentStatus {
    fn from(job: Job) -> Self {
        // Result and error are only reported once the job is terminal
        let (result, error) = match job.status {
            JobStatus::Finished => (job.result, None),
            JobStatus::Failed => (
                None,
                Some(job.error.unwrap_or_else(|| "Job failed".to_string())),
            ),
            _ => (None, None),
        };

        Self {
            job_id: job.id,
            status: job.status,
            result,
            error,
        }
    }
}

/// Request from a worker to claim a queued job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimJobRequest {
    pub worker_id: String,
}

/// Everything a worker needs to execute a claimed job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobExecutionInfo {
    pub job_id: Uuid,
    pub request: AssessmentRequest,
    pub attempts: i32,
}

/// Terminal outcome reported by a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    Finished { result: AssessmentResult },
    Failed { error: String },
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Finished { .. } => JobStatus::Finished,
            JobOutcome::Failed { .. } => JobStatus::Failed,
        }
    }
}

/// Request from a worker to record a job's terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteJobRequest {
    pub worker_id: String,
    pub outcome: JobOutcome,
}
