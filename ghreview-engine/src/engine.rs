//! Assessment pipeline
//!
//! Runs resolve → select → sample → summarize → aggregate for one request.
//! The engine keeps no state between runs, so a redelivered job simply runs
//! the whole pipeline again.

use std::sync::Arc;

use ghreview_core::domain::assessment::{AssessmentRequest, AssessmentResult};
use tracing::{info, instrument};

use crate::aggregator::aggregate;
use crate::config::EngineConfig;
use crate::error::{EngineError, PlatformError, Result, SummarizerError};
use crate::platform::{GitHubClient, SourcePlatform};
use crate::resolver::IdentityResolver;
use crate::sampler::ArtifactSampler;
use crate::selector::RepositorySelector;
use crate::summarizer::{OpenAiSummarizer, Summarizer};

/// Executes assessment requests end to end
pub struct AssessmentEngine {
    resolver: IdentityResolver,
    selector: RepositorySelector,
    sampler: ArtifactSampler,
    summarizer: Arc<dyn Summarizer>,
    repo_concurrency: usize,
}

impl AssessmentEngine {
    /// Wire the engine to an explicit platform and summarizer
    pub fn new(
        config: &EngineConfig,
        platform: Arc<dyn SourcePlatform>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(Arc::clone(&platform)),
            selector: RepositorySelector::new(Arc::clone(&platform), config.max_repos),
            sampler: ArtifactSampler::new(
                platform,
                config.max_files_per_repo,
                config.max_chars_per_file,
            ),
            summarizer,
            repo_concurrency: config.repo_concurrency,
        }
    }

    /// Build the production engine: GitHub platform and OpenAI summarizer
    pub fn from_config(config: &EngineConfig) -> std::result::Result<Self, BuildError> {
        let platform = GitHubClient::new(config)?;
        let summarizer = OpenAiSummarizer::new(config)?;
        Ok(Self::new(config, Arc::new(platform), Arc::new(summarizer)))
    }

    /// Run the full pipeline for a request
    #[instrument(skip_all, fields(requested_by = request.requested_by.as_deref().unwrap_or("anonymous")))]
    pub async fn run(&self, request: &AssessmentRequest) -> Result<AssessmentResult> {
        let user = self
            .resolver
            .resolve(request.username(), request.email())
            .await?
            .ok_or(EngineError::Unresolved)?;

        let candidates = self.selector.select(&user).await?;
        let samples = self
            .sampler
            .sample_all(candidates, self.repo_concurrency)
            .await?;

        let summary = self.summarizer.summarize(&user, &samples).await?;

        info!(
            login = user.login().unwrap_or_default(),
            repositories = samples.len(),
            "Assessment complete"
        );

        aggregate(user, samples, summary, request.requested_by.clone())
    }
}

/// Errors raised while constructing the production engine
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to build GitHub client: {0}")]
    Platform(#[from] PlatformError),

    #[error("Failed to build summarizer: {0}")]
    Summarizer(#[from] SummarizerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePlatform, FakeSummarizer, UnconfiguredSummarizer, repo};

    fn octocat_platform() -> FakePlatform {
        let mut fork = repo("octocat", "forked", 900);
        fork.fork = true;

        FakePlatform::default()
            .with_user("octocat")
            .with_repos(
                "octocat",
                vec![
                    repo("octocat", "ten", 10),
                    repo("octocat", "fifty-a", 50),
                    fork,
                    repo("octocat", "two", 2),
                    repo("octocat", "fifty-b", 50),
                    repo("octocat", "zero", 0),
                ],
            )
            .with_readme("octocat/fifty-a", "# Fifty A")
            .with_file("octocat/fifty-a", "big.rs", "123456")
            .with_file("octocat/fifty-a", "mid.rs", "1234")
            .with_file("octocat/fifty-a", "small.rs", "12")
            .with_broken_file("octocat/fifty-a", "mid.rs")
    }

    fn engine(platform: FakePlatform, summarizer: Arc<dyn Summarizer>) -> AssessmentEngine {
        let config = EngineConfig {
            max_repos: 4,
            ..EngineConfig::default()
        };
        AssessmentEngine::new(&config, Arc::new(platform), summarizer)
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let engine = engine(octocat_platform(), Arc::new(FakeSummarizer));
        let mut request = AssessmentRequest::for_username("octocat");
        request.requested_by = Some("alice".to_string());

        let result = engine.run(&request).await.unwrap();

        let names: Vec<_> = result
            .repositories
            .iter()
            .map(|r| r.repository.name.as_str())
            .collect();
        assert_eq!(names, vec!["fifty-a", "fifty-b", "ten", "two"]);

        let first = &result.repositories[0];
        assert_eq!(first.readme.as_deref(), Some("# Fifty A"));
        let files: Vec<_> = first.sampled_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(files, vec!["big.rs", "small.rs"]);

        assert_eq!(result.summary, "octocat has 4 sampled repositories");
        assert_eq!(result.requested_by.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_rerun_is_identical() {
        let engine = engine(octocat_platform(), Arc::new(FakeSummarizer));
        let request = AssessmentRequest::for_username("octocat");

        let first = engine.run(&request).await.unwrap();
        let second = engine.run(&request).await.unwrap();

        assert_eq!(first.user, second.user);
        assert_eq!(first.repositories, second.repositories);
    }

    #[tokio::test]
    async fn test_no_hints_fails_with_unresolved() {
        let engine = engine(octocat_platform(), Arc::new(FakeSummarizer));

        let err = engine.run(&AssessmentRequest::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::Unresolved));
        assert!(err.to_string().contains("Unable to resolve"));
    }

    #[tokio::test]
    async fn test_denied_email_search_fails_with_unresolved() {
        let platform = FakePlatform {
            deny_search: true,
            ..octocat_platform()
        };
        let engine = engine(platform, Arc::new(FakeSummarizer));

        let err = engine
            .run(&AssessmentRequest::for_email("a@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unresolved));
    }

    #[tokio::test]
    async fn test_summarizer_fault_is_fatal() {
        let engine = engine(octocat_platform(), Arc::new(UnconfiguredSummarizer));

        let err = engine
            .run(&AssessmentRequest::for_username("octocat"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Summarizer(_)));
    }

    #[tokio::test]
    async fn test_wider_pool_keeps_order() {
        let config = EngineConfig {
            max_repos: 4,
            repo_concurrency: 3,
            ..EngineConfig::default()
        };
        let engine = AssessmentEngine::new(
            &config,
            Arc::new(octocat_platform()),
            Arc::new(FakeSummarizer),
        );

        let result = engine
            .run(&AssessmentRequest::for_username("octocat"))
            .await
            .unwrap();
        let names: Vec<_> = result
            .repositories
            .iter()
            .map(|r| r.repository.name.as_str())
            .collect();
        assert_eq!(names, vec!["fifty-a", "fifty-b", "ten", "two"]);
    }
}
