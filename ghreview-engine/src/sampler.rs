//! Artifact sampling
//!
//! For each selected repository, captures the README and the largest
//! top-level files, both truncated to the configured character limit.
//!
//! Within a repository the README lookup and the file sampling run
//! concurrently and are joined before the sample is returned. Across
//! repositories, [`ArtifactSampler::sample_all`] runs a bounded, ordered pool,
//! so at most `2 × concurrency` platform requests are in flight at once.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use ghreview_core::domain::assessment::{
    FileSample, RepositoryCandidate, RepositorySample, truncate_chars,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{EngineError, Result};
use crate::platform::SourcePlatform;

/// Captures README and file samples from repositories
pub struct ArtifactSampler {
    platform: Arc<dyn SourcePlatform>,
    max_files_per_repo: usize,
    max_chars_per_file: usize,
}

impl ArtifactSampler {
    pub fn new(
        platform: Arc<dyn SourcePlatform>,
        max_files_per_repo: usize,
        max_chars_per_file: usize,
    ) -> Self {
        Self {
            platform,
            max_files_per_repo,
            max_chars_per_file,
        }
    }

    /// Sample every repository, keeping the input order
    ///
    /// `concurrency` repositories are sampled at a time (values below 1 are
    /// treated as 1). The first fatal error stops the run.
    pub async fn sample_all(
        &self,
        repositories: Vec<RepositoryCandidate>,
        concurrency: usize,
    ) -> Result<Vec<RepositorySample>> {
        stream::iter(repositories)
            .map(|repository| self.sample(repository))
            .buffered(concurrency.max(1))
            .try_collect()
            .await
    }

    /// Sample a single repository
    ///
    /// Only a hard failure of the README metadata lookup is fatal. A missing
    /// README, an unreadable README body, an unreadable directory listing and
    /// individual file failures all degrade the sample instead.
    #[instrument(skip_all, fields(repo = %repository.full_name))]
    pub async fn sample(&self, repository: RepositoryCandidate) -> Result<RepositorySample> {
        let (readme, sampled_files) = tokio::join!(
            self.fetch_readme(&repository.full_name),
            self.sample_files(&repository.full_name)
        );
        let readme = readme?;

        info!(
            has_readme = readme.is_some(),
            files = sampled_files.len(),
            "Sampled repository"
        );

        Ok(RepositorySample {
            repository,
            readme,
            sampled_files,
        })
    }

    async fn fetch_readme(&self, full_name: &str) -> Result<Option<String>> {
        let entry = self.platform.readme(full_name).await.map_err(|e| {
            EngineError::platform(format!("Failed to fetch README for {}", full_name), e)
        })?;

        let Some(download_url) = entry.and_then(|e| e.download_url) else {
            debug!("Repository has no README");
            return Ok(None);
        };

        match self.platform.fetch_raw(&download_url).await {
            Ok(text) => Ok(Some(truncate_chars(&text, self.max_chars_per_file))),
            Err(e) => {
                warn!("Failed to download README: {}", e);
                Ok(None)
            }
        }
    }

    async fn sample_files(&self, full_name: &str) -> Vec<FileSample> {
        let entries = match self.platform.list_contents(full_name).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list repository contents: {}", e);
                return Vec::new();
            }
        };

        let mut files: Vec<_> = entries.into_iter().filter(|e| e.is_file()).collect();
        files.sort_by(|a, b| b.size.cmp(&a.size));
        files.truncate(self.max_files_per_repo);

        let mut samples = Vec::with_capacity(files.len());
        for file in files {
            let Some(download_url) = file.download_url.as_deref() else {
                debug!(path = %file.path, "File has no download URL, skipping");
                continue;
            };

            match self.platform.fetch_raw(download_url).await {
                Ok(text) => samples.push(FileSample {
                    content: truncate_chars(&text, self.max_chars_per_file),
                    path: file.path,
                    size_bytes: file.size,
                }),
                Err(e) => warn!(path = %file.path, "Dropping file from sample: {}", e),
            }
        }

        samples
    }
}
