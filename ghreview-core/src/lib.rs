//! ghreview Core
//!
//! Core types and abstractions for the ghreview assessment service.
//!
//! This crate contains:
//! - Domain types: Core business entities (AssessmentRequest, Job, samples)
//! - DTOs: Data transfer objects for inter-service communication

pub mod domain;
pub mod dto;
