//! Source platform access
//!
//! The engine reads everything it needs through the [`SourcePlatform`] trait.
//! [`GitHubClient`] is the production implementation; tests substitute an
//! in-memory platform.

mod github;

pub use github::GitHubClient;

use async_trait::async_trait;
use ghreview_core::domain::assessment::{RepositoryCandidate, UserIdentity};
use serde::Deserialize;

use crate::error::PlatformError;

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// A file or directory reported by a contents/README lookup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    /// Location of the raw content, absent for directories
    #[serde(default)]
    pub download_url: Option<String>,
}

fn default_kind() -> EntryKind {
    EntryKind::File
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Read-only view of a GitHub-like code hosting platform
#[async_trait]
pub trait SourcePlatform: Send + Sync {
    /// Looks up an account by handle; `Ok(None)` when it does not exist
    async fn get_user(&self, login: &str) -> Result<Option<UserIdentity>>;

    /// Searches for an account by email and returns the first matching handle
    ///
    /// Platforms that refuse the query return [`PlatformError::Denied`].
    async fn search_login_by_email(&self, email: &str) -> Result<Option<String>>;

    /// Lists an account's repositories, most recently updated first
    async fn list_repositories(&self, login: &str) -> Result<Vec<RepositoryCandidate>>;

    /// README metadata of a repository; `Ok(None)` when it has none
    async fn readme(&self, full_name: &str) -> Result<Option<ContentEntry>>;

    /// Top-level directory listing of a repository
    async fn list_contents(&self, full_name: &str) -> Result<Vec<ContentEntry>>;

    /// Raw text behind a download URL
    async fn fetch_raw(&self, url: &str) -> Result<String>;
}
