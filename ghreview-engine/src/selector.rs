//! Repository selection
//!
//! Picks the repositories worth sampling: own work only, most starred
//! first, capped so the sampling cost stays bounded for any account size.

use std::sync::Arc;

use ghreview_core::domain::assessment::{RepositoryCandidate, UserIdentity};
use tracing::{info, instrument};

use crate::error::{EngineError, Result};
use crate::platform::SourcePlatform;

/// Selects the candidate repositories of an account
pub struct RepositorySelector {
    platform: Arc<dyn SourcePlatform>,
    max_repos: usize,
}

impl RepositorySelector {
    pub fn new(platform: Arc<dyn SourcePlatform>, max_repos: usize) -> Self {
        Self {
            platform,
            max_repos,
        }
    }

    /// Fetch the account's repositories and rank them
    #[instrument(skip_all, fields(login = identity.login().unwrap_or_default()))]
    pub async fn select(&self, identity: &UserIdentity) -> Result<Vec<RepositoryCandidate>> {
        let login = identity
            .login()
            .ok_or_else(|| EngineError::InvalidData("user record has no login".to_string()))?;

        let repos = self.platform.list_repositories(login).await.map_err(|e| {
            EngineError::platform(format!("Failed to list repositories for {}", login), e)
        })?;

        let listed = repos.len();
        let selected = rank_candidates(repos, self.max_repos);
        info!(listed, selected = selected.len(), "Selected repositories");

        Ok(selected)
    }
}

/// Drop forks and archived repositories, order by stars and cap the count
///
/// The sort is stable, so repositories with equal stars keep their listing order.
pub fn rank_candidates(
    repos: Vec<RepositoryCandidate>,
    max_repos: usize,
) -> Vec<RepositoryCandidate> {
    let mut candidates: Vec<RepositoryCandidate> = repos
        .into_iter()
        .filter(|repo| !repo.fork && !repo.archived)
        .collect();

    candidates.sort_by(|a, b| b.star_count.cmp(&a.star_count));
    candidates.truncate(max_repos);
    candidates
}
