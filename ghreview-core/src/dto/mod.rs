//! Data Transfer Objects for inter-service communication
//!
//! This module contains DTOs used for communication between ghreview services
//! (orchestrator, worker, cli).

pub mod job;
