//! Profile summarization
//!
//! The [`Summarizer`] receives the resolved user and the repository samples
//! and returns prose. [`OpenAiSummarizer`] talks to any OpenAI-compatible
//! chat completions endpoint.

use async_trait::async_trait;
use ghreview_core::domain::assessment::{RepositorySample, UserIdentity};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::SummarizerError;

const SYSTEM_PROMPT: &str = "\
You are an experienced engineering hiring manager. You will see metadata and small samples \
of a candidate's public GitHub work. Produce:
1) A short summary of the candidate's profile and technical breadth.
2) Strengths and positive signals.
3) Risks or gaps to explore in an interview.
4) Suggested interview focus areas.
Keep it concise (under 300 words). Avoid fabricating details. Prefer evidence from repo samples.";

const TEMPERATURE: f32 = 0.35;
const MAX_TOKENS: u32 = 600;

/// Turns an assembled sample into a written assessment
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        identity: &UserIdentity,
        samples: &[RepositorySample],
    ) -> Result<String, SummarizerError>;
}

/// OpenAI-compatible chat completions summarizer
pub struct OpenAiSummarizer {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    /// Create a summarizer from the engine configuration
    ///
    /// A missing API key is accepted here and reported when a summary is requested.
    pub fn new(config: &EngineConfig) -> Result<Self, SummarizerError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    #[instrument(skip_all, fields(model = %self.model, repositories = samples.len()))]
    async fn summarize(
        &self,
        identity: &UserIdentity,
        samples: &[RepositorySample],
    ) -> Result<String, SummarizerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummarizerError::NotConfigured)?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(identity, samples)?,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!("Sending summary request");

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummarizerError::EmptyCompletion)
    }
}

/// System and user messages for a summary request
pub fn build_messages(
    identity: &UserIdentity,
    samples: &[RepositorySample],
) -> Result<Vec<ChatMessage>, SummarizerError> {
    let snippets: Vec<Value> = samples.iter().map(repository_snippet).collect();

    let user = serde_json::to_string(identity)?;
    let repos = serde_json::to_string(&snippets)?;

    Ok(vec![
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: format!(
                "User profile: {}\nRepositories: {}\nProvide the evaluation now.",
                user, repos
            ),
        },
    ])
}

fn repository_snippet(sample: &RepositorySample) -> Value {
    let repo = &sample.repository;
    json!({
        "name": repo.name,
        "description": repo.description,
        "stars": repo.star_count,
        "language": repo.primary_language,
        "topics": repo.topics,
        "readme": sample.readme,
        "sampled_files": sample.sampled_files,
    })
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
