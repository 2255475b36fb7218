//! ghreview HTTP Client
//!
//! A simple, type-safe HTTP client for the ghreview orchestrator API.
//!
//! Both the CLI and the worker talk to the orchestrator through this crate:
//! the CLI submits assessments and polls their status, the worker lists,
//! claims and completes jobs.
//!
//! # Example
//!
//! ```no_run
//! use ghreview_client::OrchestratorClient;
//! use ghreview_core::dto::job::SubmitAssessment;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OrchestratorClient::new("http://localhost:8080");
//!
//!     let status = client
//!         .submit_assessment(
//!             SubmitAssessment {
//!                 github_username: Some("octocat".to_string()),
//!                 email: None,
//!             },
//!             None,
//!         )
//!         .await?;
//!
//!     println!("Submitted job: {}", status.job_id);
//!     Ok(())
//! }
//! ```

mod assessments;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use ghreview_core::dto::job::JobExecutionInfo;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the ghreview orchestrator API
///
/// Methods are organized into two groups:
/// - Assessments (submit, status, health) for callers
/// - Job lifecycle (scheduled, claim, complete) for workers
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// # Example
    /// ```
    /// use ghreview_client::OrchestratorClient;
    ///
    /// let client = OrchestratorClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code of a response without a body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
