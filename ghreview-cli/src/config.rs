//! Configuration module
//!
//! Handles CLI configuration including orchestrator URL and other settings.

use std::time::Duration;

use anyhow::{Context, Result};
use ghreview_client::OrchestratorClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the orchestrator service
    pub orchestrator_url: String,

    /// Timeout for each request to the orchestrator
    pub request_timeout: Duration,
}

impl Config {
    /// Build an orchestrator client honoring the request timeout
    pub fn client(&self) -> Result<OrchestratorClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(OrchestratorClient::with_client(
            self.orchestrator_url.clone(),
            http,
        ))
    }
}
