//! Scheduler layer for the worker
//!
//! Polls the orchestrator for queued jobs and drives each one from claim to
//! completion.

pub mod poller;

pub use poller::JobPoller;
