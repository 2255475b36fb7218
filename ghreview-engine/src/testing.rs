//! In-memory platform and summarizer used by the engine's unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ghreview_core::domain::assessment::{RepositoryCandidate, RepositorySample, UserIdentity};
use serde_json::json;

use crate::error::{PlatformError, SummarizerError};
use crate::platform::{ContentEntry, EntryKind, Result, SourcePlatform};
use crate::summarizer::Summarizer;

#[derive(Default)]
pub struct FakePlatform {
    pub users: HashMap<String, UserIdentity>,
    pub emails: HashMap<String, String>,
    pub deny_search: bool,
    pub repos: HashMap<String, Vec<RepositoryCandidate>>,
    pub readmes: HashMap<String, ContentEntry>,
    pub readme_errors: HashMap<String, u16>,
    pub contents: HashMap<String, Vec<ContentEntry>>,
    pub raw: HashMap<String, String>,
    pub broken_urls: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    /// Delay applied to README, listing and raw fetches
    pub latency: Option<Duration>,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakePlatform {
    pub fn with_user(mut self, login: &str) -> Self {
        self.users.insert(login.to_string(), identity(login));
        self
    }

    pub fn with_email(mut self, email: &str, login: &str) -> Self {
        self.emails.insert(email.to_string(), login.to_string());
        self
    }

    pub fn with_repos(mut self, login: &str, repos: Vec<RepositoryCandidate>) -> Self {
        self.repos.insert(login.to_string(), repos);
        self
    }

    pub fn with_readme(mut self, full_name: &str, text: &str) -> Self {
        let url = format!("raw://{}/README.md", full_name);
        self.readmes.insert(
            full_name.to_string(),
            file_entry("README.md", text.len() as u64, Some(&url)),
        );
        self.raw.insert(url, text.to_string());
        self
    }

    pub fn with_file(mut self, full_name: &str, path: &str, content: &str) -> Self {
        let url = format!("raw://{}/{}", full_name, path);
        self.contents
            .entry(full_name.to_string())
            .or_default()
            .push(file_entry(path, content.len() as u64, Some(&url)));
        self.raw.insert(url, content.to_string());
        self
    }

    pub fn with_entry(mut self, full_name: &str, entry: ContentEntry) -> Self {
        self.contents
            .entry(full_name.to_string())
            .or_default()
            .push(entry);
        self
    }

    pub fn with_broken_file(mut self, full_name: &str, path: &str) -> Self {
        self.broken_urls
            .insert(format!("raw://{}/{}", full_name, path));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Highest number of README, listing and raw fetches seen at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn simulate_request(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SourcePlatform for FakePlatform {
    async fn get_user(&self, login: &str) -> Result<Option<UserIdentity>> {
        self.record(format!("get_user:{}", login));
        Ok(self.users.get(login).cloned())
    }

    async fn search_login_by_email(&self, email: &str) -> Result<Option<String>> {
        self.record(format!("search:{}", email));
        if self.deny_search {
            return Err(PlatformError::from_status(422, "Validation Failed"));
        }
        Ok(self.emails.get(email).cloned())
    }

    async fn list_repositories(&self, login: &str) -> Result<Vec<RepositoryCandidate>> {
        self.record(format!("list_repositories:{}", login));
        self.repos
            .get(login)
            .cloned()
            .ok_or_else(|| PlatformError::from_status(500, "listing unavailable"))
    }

    async fn readme(&self, full_name: &str) -> Result<Option<ContentEntry>> {
        self.record(format!("readme:{}", full_name));
        self.simulate_request().await;
        if let Some(status) = self.readme_errors.get(full_name) {
            return Err(PlatformError::from_status(*status, "readme lookup failed"));
        }
        Ok(self.readmes.get(full_name).cloned())
    }

    async fn list_contents(&self, full_name: &str) -> Result<Vec<ContentEntry>> {
        self.record(format!("list_contents:{}", full_name));
        self.simulate_request().await;
        self.contents
            .get(full_name)
            .cloned()
            .ok_or_else(|| PlatformError::from_status(404, "This repository is empty."))
    }

    async fn fetch_raw(&self, url: &str) -> Result<String> {
        self.record(format!("fetch_raw:{}", url));
        self.simulate_request().await;
        if self.broken_urls.contains(url) {
            return Err(PlatformError::from_status(502, "Bad Gateway"));
        }
        self.raw
            .get(url)
            .cloned()
            .ok_or_else(|| PlatformError::from_status(404, "Not Found"))
    }
}

/// Summarizer that reports how many repositories it saw
pub struct FakeSummarizer;

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(
        &self,
        identity: &UserIdentity,
        samples: &[RepositorySample],
    ) -> std::result::Result<String, SummarizerError> {
        Ok(format!(
            "{} has {} sampled repositories",
            identity.login().unwrap_or("unknown"),
            samples.len()
        ))
    }
}

/// Summarizer that always fails like an unconfigured deployment
pub struct UnconfiguredSummarizer;

#[async_trait]
impl Summarizer for UnconfiguredSummarizer {
    async fn summarize(
        &self,
        _identity: &UserIdentity,
        _samples: &[RepositorySample],
    ) -> std::result::Result<String, SummarizerError> {
        Err(SummarizerError::NotConfigured)
    }
}

pub fn identity(login: &str) -> UserIdentity {
    let value = json!({
        "login": login,
        "id": 583231,
        "name": "The Octocat",
        "html_url": format!("https://github.com/{}", login),
    });
    match value {
        serde_json::Value::Object(map) => UserIdentity(map),
        _ => unreachable!(),
    }
}

pub fn repo(owner: &str, name: &str, stars: u64) -> RepositoryCandidate {
    RepositoryCandidate {
        name: name.to_string(),
        full_name: format!("{}/{}", owner, name),
        description: Some(format!("{} description", name)),
        url: format!("https://github.com/{}/{}", owner, name),
        star_count: stars,
        primary_language: Some("Rust".to_string()),
        topics: vec!["cli".to_string()],
        fork: false,
        archived: false,
    }
}

pub fn file_entry(path: &str, size: u64, download_url: Option<&str>) -> ContentEntry {
    ContentEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        kind: EntryKind::File,
        size,
        download_url: download_url.map(str::to_string),
    }
}

pub fn dir_entry(path: &str) -> ContentEntry {
    ContentEntry {
        name: path.to_string(),
        path: path.to_string(),
        kind: EntryKind::Dir,
        size: 0,
        download_url: None,
    }
}
