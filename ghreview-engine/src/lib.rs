//! ghreview Engine
//!
//! Gathers a bounded sample of a person's public GitHub work and hands it to
//! a summarizer.
//!
//! Pipeline, leaves first:
//! - [`resolver`]: username-or-email hint → account record
//! - [`selector`]: account → ranked, capped repository candidates
//! - [`sampler`]: candidate → README and largest files, truncated
//! - [`aggregator`]: samples + summary → [`AssessmentResult`]
//! - [`engine`]: runs the above for one request
//!
//! # Example
//!
//! ```no_run
//! use ghreview_core::domain::assessment::AssessmentRequest;
//! use ghreview_engine::{AssessmentEngine, EngineConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::from_env();
//!     config.validate()?;
//!
//!     let engine = AssessmentEngine::from_config(&config)?;
//!     let result = engine.run(&AssessmentRequest::for_username("octocat")).await?;
//!
//!     println!("{}", result.summary);
//!     Ok(())
//! }
//! ```
//!
//! [`AssessmentResult`]: ghreview_core::domain::assessment::AssessmentResult

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod resolver;
pub mod sampler;
pub mod selector;
pub mod summarizer;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{AssessmentEngine, BuildError};
pub use error::{EngineError, PlatformError, SummarizerError};
pub use platform::{GitHubClient, SourcePlatform};
pub use summarizer::{OpenAiSummarizer, Summarizer};
