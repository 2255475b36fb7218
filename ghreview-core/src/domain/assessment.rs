//! Assessment domain types
//!
//! The request a caller submits and the sample/result structures the engine
//! assembles for it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity hint submitted by a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// GitHub handle, preferred over email when both are present
    #[serde(default)]
    pub github_username: Option<String>,
    /// Email address used for a reverse lookup when the handle is missing or unknown
    #[serde(default)]
    pub email: Option<String>,
    /// Provenance tag taken from the authenticated submitter
    #[serde(default)]
    pub requested_by: Option<String>,
}

impl AssessmentRequest {
    pub fn for_username(username: impl Into<String>) -> Self {
        Self {
            github_username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Username with surrounding whitespace removed, `None` when blank
    pub fn username(&self) -> Option<&str> {
        non_blank(self.github_username.as_deref())
    }

    /// Email with surrounding whitespace removed, `None` when blank
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Account record returned by the source platform
///
/// Kept as an opaque JSON object. The only field the engine relies on is `login`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(pub Map<String, Value>);

impl UserIdentity {
    /// The account handle, if the record carries one
    pub fn login(&self) -> Option<&str> {
        self.0
            .get("login")
            .and_then(Value::as_str)
            .filter(|login| !login.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for UserIdentity {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Repository eligible for sampling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCandidate {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub star_count: u64,
    pub primary_language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}

/// Content of a single sampled file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSample {
    pub path: String,
    pub size_bytes: u64,
    pub content: String,
}

/// Metadata plus the README and file sample captured for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySample {
    #[serde(flatten)]
    pub repository: RepositoryCandidate,
    pub readme: Option<String>,
    /// Ordered by `size_bytes`, largest first
    #[serde(default)]
    pub sampled_files: Vec<FileSample>,
}

/// Final output of an assessment job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub user: UserIdentity,
    pub repositories: Vec<RepositorySample>,
    pub summary: String,
    pub requested_by: Option<String>,
}

/// Truncate `text` to at most `max_chars` characters
///
/// Counts Unicode scalar values so a multi-byte character is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
