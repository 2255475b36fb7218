//! Job domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::assessment::{AssessmentRequest, AssessmentResult};

/// Assessment job record
///
/// Structure shared between orchestrator (persists) and worker (executes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub request: AssessmentRequest,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub worker_id: Option<String>,
    /// Number of times the job has been claimed
    pub attempts: i32,
    pub result: Option<AssessmentResult>,
    pub error: Option<String>,
}

/// Job lifecycle status
///
/// `queued → started → finished | failed`. Terminal states are absorbing.
/// `started → queued` only happens when the queue redelivers a stale claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Started,
    Finished,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Started => "started",
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(JobStatus::Queued),
            "started" => Some(JobStatus::Started),
            "finished" => Some(JobStatus::Finished),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Started)
                | (JobStatus::Started, JobStatus::Finished)
                | (JobStatus::Started, JobStatus::Failed)
                | (JobStatus::Started, JobStatus::Queued)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [JobStatus; 4] = [
        JobStatus::Queued,
        JobStatus::Started,
        JobStatus::Finished,
        JobStatus::Failed,
    ];

    #[test]
    fn test_terminal_states_are_absorbing() {
        for terminal in [JobStatus::Finished, JobStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in ALL {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Started));
        assert!(JobStatus::Started.can_transition_to(JobStatus::Finished));
        assert!(JobStatus::Started.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Started.can_transition_to(JobStatus::Queued));

        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Finished));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::Queued));
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("deferred"), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let value = serde_json::to_value(JobStatus::Finished).unwrap();
        assert_eq!(value, serde_json::json!("finished"));
    }
}
