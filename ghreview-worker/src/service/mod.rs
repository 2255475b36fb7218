//! Service layer
//!
//! Trait-based so the poller can be tested without a live engine.

mod execution;

pub use execution::{EngineExecutionService, ExecutionService};
