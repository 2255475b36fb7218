//! Error types for the assessment engine

use thiserror::Error;

/// Message reported when neither the username nor the email leads to an account
pub const UNRESOLVED_IDENTITY: &str = "Unable to resolve GitHub user from username or email";

/// Errors returned by a source platform
///
/// "Absent" and "denied" are kept apart from other failures because the
/// resolver and sampler fall back differently on each.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform reported the resource as absent (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The platform refused the query (403/422)
    #[error("Request denied (status {status}): {message}")]
    Denied {
        /// HTTP status code
        status: u16,
        /// Error message from the platform
        message: String,
    },

    /// The platform returned any other non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the platform
        message: String,
    },

    /// The request could not be sent or timed out
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl PlatformError {
    /// Classify a non-success status into the matching variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            403 | 422 => Self::Denied { status, message },
            _ => Self::Api { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }
}

/// Errors raised by the summarizer
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// No credential configured
    #[error(
        "OpenAI is not configured. Set OPENAI_API_KEY (or GH_REVIEW_OPENAI_API_KEY) to run assessments."
    )]
    NotConfigured,

    /// The completion endpoint returned a non-success status
    #[error("Summarizer API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or timed out
    #[error("Summarizer request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The completion contained no text
    #[error("Summarizer returned an empty completion")]
    EmptyCompletion,

    /// The request or response could not be (de)serialized
    #[error("Failed to encode summarizer payload: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors that end an assessment run
#[derive(Debug, Error)]
pub enum EngineError {
    /// No account matched the username or email
    #[error("{}", UNRESOLVED_IDENTITY)]
    Unresolved,

    /// A required platform call failed
    #[error("{context}: {source}")]
    Platform {
        context: String,
        #[source]
        source: PlatformError,
    },

    /// The summarizer failed
    #[error(transparent)]
    Summarizer(#[from] SummarizerError),

    /// A required field was missing while assembling the result
    #[error("Invalid assessment data: {0}")]
    InvalidData(String),
}

impl EngineError {
    pub fn platform(context: impl Into<String>, source: PlatformError) -> Self {
        Self::Platform {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
