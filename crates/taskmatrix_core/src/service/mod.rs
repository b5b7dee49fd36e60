//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport/bootstrap layers decoupled from storage details.

pub mod stats_service;
pub mod task_service;
