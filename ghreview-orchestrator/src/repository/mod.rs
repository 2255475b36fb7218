//! Repository Module
//!
//! Data access layer for the orchestrator.

pub mod job;

// Re-export for convenience
pub use job as job_repository;
