//! Engine configuration
//!
//! Sampling limits, platform connection settings and summarizer credentials.
//! A single `EngineConfig` value is built at startup and handed to each
//! component's constructor.

use std::time::Duration;

/// Upper bound for the cross-repository sampling pool
pub const MAX_REPO_CONCURRENCY: usize = 5;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the GitHub REST API
    pub github_api_url: String,

    /// Personal access token, sent as a bearer token when present
    pub github_token: Option<String>,

    /// User-Agent header for outbound platform requests
    pub user_agent: String,

    /// Per-request timeout applied by the HTTP client (platform and summarizer)
    pub request_timeout: Duration,

    /// Maximum repositories sampled per user
    pub max_repos: usize,

    /// Maximum files sampled per repository
    pub max_files_per_repo: usize,

    /// Maximum characters kept from a README or sampled file
    pub max_chars_per_file: usize,

    /// Repositories sampled at the same time (1 = one at a time)
    pub repo_concurrency: usize,

    /// OpenAI access key; assessments fail without it
    pub openai_api_key: Option<String>,

    /// Chat model used by the summarizer
    pub openai_model: String,

    /// Base URL of the OpenAI-compatible API
    pub openai_base_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            github_api_url: "https://api.github.com".to_string(),
            github_token: None,
            user_agent: "ghreview/0.1".to_string(),
            request_timeout: Duration::from_secs(15),
            max_repos: 8,
            max_files_per_repo: 3,
            max_chars_per_file: 4000,
            repo_concurrency: 1,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates configuration from environment variables
    ///
    /// Every setting is optional and read as `GH_REVIEW_<NAME>`; a few also
    /// accept their conventional unprefixed names:
    /// - GH_REVIEW_GITHUB_API_URL
    /// - GH_REVIEW_GITHUB_TOKEN / GITHUB_TOKEN
    /// - GH_REVIEW_USER_AGENT
    /// - GH_REVIEW_REQUEST_TIMEOUT (seconds, fractional allowed)
    /// - GH_REVIEW_MAX_REPOS
    /// - GH_REVIEW_MAX_FILES_PER_REPO
    /// - GH_REVIEW_MAX_CHARS_PER_FILE
    /// - GH_REVIEW_REPO_CONCURRENCY
    /// - GH_REVIEW_OPENAI_API_KEY / OPENAI_API_KEY
    /// - GH_REVIEW_OPENAI_MODEL / OPENAI_MODEL
    /// - GH_REVIEW_OPENAI_BASE_URL
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(*name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |name: &str, default: usize| {
            var(&[name])
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(default)
        };

        Self {
            github_api_url: var(&["GH_REVIEW_GITHUB_API_URL"]).unwrap_or(defaults.github_api_url),
            github_token: var(&["GH_REVIEW_GITHUB_TOKEN", "GITHUB_TOKEN"]),
            user_agent: var(&["GH_REVIEW_USER_AGENT"]).unwrap_or(defaults.user_agent),
            request_timeout: var(&["GH_REVIEW_REQUEST_TIMEOUT"])
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(defaults.request_timeout),
            max_repos: number("GH_REVIEW_MAX_REPOS", defaults.max_repos),
            max_files_per_repo: number("GH_REVIEW_MAX_FILES_PER_REPO", defaults.max_files_per_repo),
            max_chars_per_file: number("GH_REVIEW_MAX_CHARS_PER_FILE", defaults.max_chars_per_file),
            repo_concurrency: number("GH_REVIEW_REPO_CONCURRENCY", defaults.repo_concurrency),
            openai_api_key: var(&["GH_REVIEW_OPENAI_API_KEY", "OPENAI_API_KEY"]),
            openai_model: var(&["GH_REVIEW_OPENAI_MODEL", "OPENAI_MODEL"])
                .unwrap_or(defaults.openai_model),
            openai_base_url: var(&["GH_REVIEW_OPENAI_BASE_URL"])
                .unwrap_or(defaults.openai_base_url),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("github_api_url", &self.github_api_url),
            ("openai_base_url", &self.openai_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.user_agent.is_empty() {
            anyhow::bail!("user_agent cannot be empty");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.max_repos == 0 {
            anyhow::bail!("max_repos must be greater than 0");
        }

        if self.max_files_per_repo == 0 {
            anyhow::bail!("max_files_per_repo must be greater than 0");
        }

        if self.max_chars_per_file == 0 {
            anyhow::bail!("max_chars_per_file must be greater than 0");
        }

        if self.repo_concurrency == 0 || self.repo_concurrency > MAX_REPO_CONCURRENCY {
            anyhow::bail!(
                "repo_concurrency must be between 1 and {}",
                MAX_REPO_CONCURRENCY
            );
        }

        Ok(())
    }
}
