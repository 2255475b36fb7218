//! Core domain types
//!
//! This module contains the core domain structures used across ghreview services.
//! These types are shared between the orchestrator (for persistence), the worker
//! (for execution) and the engine (which produces them).

pub mod assessment;
pub mod job;
