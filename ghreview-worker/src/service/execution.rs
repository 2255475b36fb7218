//! Execution service
//!
//! Runs one assessment request through the engine and turns the outcome into
//! what the orchestrator records: the result on success, a readable error
//! message on any fault.

use async_trait::async_trait;
use ghreview_core::domain::assessment::AssessmentRequest;
use ghreview_core::dto::job::JobOutcome;
use ghreview_engine::AssessmentEngine;
use tracing::{info, warn};
use uuid::Uuid;

/// Service trait for executing assessment jobs
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Executes an assessment request
    ///
    /// Never fails: engine faults become [`JobOutcome::Failed`].
    async fn execute(&self, job_id: Uuid, request: &AssessmentRequest) -> JobOutcome;
}

/// Executes jobs with the assessment engine
pub struct EngineExecutionService {
    engine: AssessmentEngine,
}

impl EngineExecutionService {
    pub fn new(engine: AssessmentEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl ExecutionService for EngineExecutionService {
    async fn execute(&self, job_id: Uuid, request: &AssessmentRequest) -> JobOutcome {
        match self.engine.run(request).await {
            Ok(result) => {
                info!(
                    "Job {} assessed {} repositories",
                    job_id,
                    result.repositories.len()
                );
                JobOutcome::Finished { result }
            }
            Err(e) => {
                warn!("Job {} failed: {}", job_id, e);
                JobOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
