//! Worker configuration
//!
//! Defines the worker's identity, how it reaches the orchestrator, how often
//! it polls, and the engine settings every job runs with.

use std::time::Duration;

use ghreview_engine::EngineConfig;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Unique identifier for this worker instance
    pub worker_id: String,

    /// Orchestrator base URL (e.g., "http://localhost:8080")
    pub orchestrator_url: String,

    /// How often to poll the orchestrator for new jobs
    pub poll_interval: Duration,

    /// Max jobs this worker executes at the same time
    pub max_parallel_jobs: usize,

    /// Settings for the assessment engine
    pub engine: EngineConfig,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(worker_id: String, orchestrator_url: String) -> Self {
        Self {
            worker_id,
            orchestrator_url,
            poll_interval: Duration::from_secs(5),
            max_parallel_jobs: 1,
            engine: EngineConfig::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - WORKER_ID (optional, default: random UUID)
    /// - ORCHESTRATOR_URL (optional, default: http://localhost:8080)
    /// - POLL_INTERVAL (optional, seconds, default: 5)
    /// - MAX_PARALLEL_JOBS (optional, default: 1)
    ///
    /// Engine settings are read by [`EngineConfig::from_env`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let worker_id = lookup("WORKER_ID")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.worker_id);

        let orchestrator_url = lookup("ORCHESTRATOR_URL").unwrap_or(defaults.orchestrator_url);

        let poll_interval = lookup("POLL_INTERVAL")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        let max_parallel_jobs = lookup("MAX_PARALLEL_JOBS")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_parallel_jobs);

        Self {
            worker_id,
            orchestrator_url,
            poll_interval,
            max_parallel_jobs,
            engine: EngineConfig::from_lookup(lookup),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.worker_id.is_empty() {
            anyhow::bail!("worker_id cannot be empty");
        }

        if !self.orchestrator_url.starts_with("http://")
            && !self.orchestrator_url.starts_with("https://")
        {
            anyhow::bail!("orchestrator_url must start with http:// or https://");
        }

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        self.engine.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            "http://localhost:8080".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_parallel_jobs, 1);
        assert_eq!(config.engine.max_repos, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("WORKER_ID", "worker-7"),
            ("ORCHESTRATOR_URL", "http://orchestrator:8080"),
            ("POLL_INTERVAL", "2"),
            ("MAX_PARALLEL_JOBS", "3"),
            ("GH_REVIEW_MAX_REPOS", "4"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(move |key: &str| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.worker_id, "worker-7");
        assert_eq!(config.orchestrator_url, "http://orchestrator:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_parallel_jobs, 3);
        assert_eq!(config.engine.max_repos, 4);
    }

    #[test]
    fn test_blank_worker_id_gets_generated() {
        let config = Config::from_lookup(|key: &str| (key == "WORKER_ID").then(|| " ".to_string()));
        assert!(uuid::Uuid::parse_str(&config.worker_id).is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.worker_id = String::new();
        assert!(config.validate().is_err());

        config.worker_id = "test".to_string();
        config.orchestrator_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.orchestrator_url = "http://localhost:8080".to_string();
        config.max_parallel_jobs = 0;
        assert!(config.validate().is_err());

        config.max_parallel_jobs = 1;
        config.engine.max_repos = 0;
        assert!(config.validate().is_err());
    }
}
