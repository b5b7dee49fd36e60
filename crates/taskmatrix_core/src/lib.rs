//! Core domain logic for taskmatrix, a task tracker with Eisenhower
//! classification.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::eisenhower::{EvaluationState, Quadrant};
pub use model::task::{NewTask, Priority, Status, Task, TaskId, TaskPatch};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::stats_service::StatsSummary;
pub use service::task_service::{
    CreateTaskRequest, ServiceError, ServiceResult, TaskService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
