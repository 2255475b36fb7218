//! ghreview Orchestrator
//!
//! Owns the assessment job table and exposes it over HTTP: callers submit
//! and poll assessments, workers list, claim and complete jobs.

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;
pub mod sweeper;
