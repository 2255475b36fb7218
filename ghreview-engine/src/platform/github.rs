//! GitHub REST API client

use async_trait::async_trait;
use ghreview_core::domain::assessment::{RepositoryCandidate, UserIdentity};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ContentEntry, Result, SourcePlatform};
use crate::config::EngineConfig;
use crate::error::PlatformError;

/// Page size for the repository listing, large enough for typical accounts
const REPOS_PER_PAGE: u32 = 50;

/// Longest login GitHub accepts
const MAX_LOGIN_LEN: usize = 39;

/// Whether `login` has the shape of a GitHub handle
///
/// Handles are ASCII alphanumerics and hyphens and cannot start with a
/// hyphen. Anything else cannot name an account, so it is never sent upstream.
fn is_valid_login(login: &str) -> bool {
    !login.is_empty()
        && login.len() <= MAX_LOGIN_LEN
        && !login.starts_with('-')
        && login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// HTTP client for the GitHub REST API
///
/// Every request carries the GitHub JSON media type, the configured
/// User-Agent and, when a token is configured, a bearer token. The per-request
/// timeout comes from [`EngineConfig::request_timeout`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubClient {
    /// Create a client from the engine configuration
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(
            config.github_api_url.as_str(),
            config.github_token.clone(),
            client,
        ))
    }

    /// Create a client around a preconfigured reqwest client
    pub fn with_client(base_url: impl Into<String>, token: Option<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an API URL from path segments, each percent-encoded on its own
    fn segments_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PlatformError::Parse(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PlatformError::Parse(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and turn any non-success status into a classified error
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlatformError::from_status(status.as_u16(), error_text));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;

        response
            .json()
            .await
            .map_err(|e| PlatformError::Parse(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Map a 404 to `None`, keep every other outcome
fn absent_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl SourcePlatform for GitHubClient {
    async fn get_user(&self, login: &str) -> Result<Option<UserIdentity>> {
        if !is_valid_login(login) {
            debug!(login, "Not a GitHub handle, treating as unknown user");
            return Ok(None);
        }

        debug!(login, "Looking up GitHub user");
        let url = self.segments_url(&["users", login])?;
        absent_as_none(self.get_json(self.get(url.as_str())).await)
    }

    async fn search_login_by_email(&self, email: &str) -> Result<Option<String>> {
        debug!("Searching GitHub users by email");
        let url = self.api_url("/search/users");
        let query = format!("{} in:email", email);
        let request = self
            .get(&url)
            .query(&[("q", query.as_str()), ("per_page", "1")]);

        let page: SearchPage = self.get_json(request).await?;

        Ok(page
            .items
            .into_iter()
            .next()
            .and_then(|item| item.login)
            .filter(|login| !login.is_empty()))
    }

    async fn list_repositories(&self, login: &str) -> Result<Vec<RepositoryCandidate>> {
        let url = self.segments_url(&["users", login, "repos"])?;
        let per_page = REPOS_PER_PAGE.to_string();
        let request = self
            .get(url.as_str())
            .query(&[("per_page", per_page.as_str()), ("sort", "updated")]);

        let repos: Vec<GitHubRepository> = self.get_json(request).await?;
        debug!(login, count = repos.len(), "Listed repositories");

        Ok(repos.into_iter().map(RepositoryCandidate::from).collect())
    }

    async fn readme(&self, full_name: &str) -> Result<Option<ContentEntry>> {
        let url = self.api_url(&format!("/repos/{}/readme", full_name));
        absent_as_none(self.get_json(self.get(&url)).await)
    }

    async fn list_contents(&self, full_name: &str) -> Result<Vec<ContentEntry>> {
        let url = self.api_url(&format!("/repos/{}/contents", full_name));
        self.get_json(self.get(&url)).await
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        let response = self.send(self.get(url)).await?;
        Ok(response.text().await?)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
    description: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    archived: bool,
}

impl From<GitHubRepository> for RepositoryCandidate {
    fn from(repo: GitHubRepository) -> Self {
        RepositoryCandidate {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            url: repo.html_url,
            star_count: repo.stargazers_count,
            primary_language: repo.language,
            topics: repo.topics,
            fork: repo.fork,
            archived: repo.archived,
        }
    }
}
