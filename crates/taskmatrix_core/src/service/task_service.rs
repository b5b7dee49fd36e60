//! Task use-case service: create, list, partial update, toggle, delete,
//! stats.
//!
//! # Responsibility
//! - Validate caller input and enforce the status/completion invariant.
//! - Delegate persistence to the injected repository.
//!
//! # Invariants
//! - `NotFound` and validation errors abort with nothing persisted.
//! - An evaluation payload that fails to serialize is logged and skipped;
//!   the rest of the update still applies. Callers rely on this
//!   partial-success behavior.

use crate::model::eisenhower::EvaluationState;
use crate::model::task::{NewTask, Priority, Status, Task, TaskId, TaskPatch};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::service::stats_service::{aggregate, StatsSummary};
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to the request-handling caller.
#[derive(Debug)]
pub enum ServiceError {
    /// Missing or invalid required input, e.g. an empty title.
    Validation(String),
    /// Update payload carried no recognized field.
    EmptyUpdate,
    /// Referenced task id does not exist.
    NotFound(TaskId),
    /// Store failure; propagated without retries.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::EmptyUpdate => write!(f, "update payload contains no recognized fields"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Creation payload. Only `title` is required; `priority` stays a raw
/// string so unknown values can fall back to the default instead of
/// failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<f64>,
    #[serde(default)]
    pub start_deadline: Option<String>,
    #[serde(default)]
    pub eisenhower_evaluation: Option<Value>,
}

/// Use-case service over an injected record store.
///
/// Stateless apart from the repository handle; no process-wide
/// singletons.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all tasks in priority-then-recency order.
    pub fn list_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks()?)
    }

    /// Creates a task from caller input.
    ///
    /// # Contract
    /// - Fails `Validation` when the title is empty after trimming.
    /// - An unknown priority value falls back to `medium`.
    /// - New tasks start as `todo`/not-completed with `created_at = now`.
    /// - An evaluation payload that fails to serialize is logged and the
    ///   task is created without one.
    pub fn create_task(&self, request: CreateTaskRequest) -> ServiceResult<Task> {
        if request.title.trim().is_empty() {
            return Err(ServiceError::Validation("title is required".to_string()));
        }

        let priority = request
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default();

        let eisenhower_evaluation = match request.eisenhower_evaluation {
            None => EvaluationState::Absent,
            Some(value) => match serde_json::to_string(&value) {
                Ok(_) => EvaluationState::Valid(value),
                Err(err) => {
                    warn!(
                        "event=task_create module=service status=skip field=eisenhower_evaluation error={err}"
                    );
                    EvaluationState::Absent
                }
            },
        };

        let new_task = NewTask {
            title: request.title,
            description: request.description.unwrap_or_default(),
            priority,
            due_date: request.due_date,
            estimated_duration: request.estimated_duration,
            start_deadline: request.start_deadline,
            status: Status::Todo,
            completed: false,
            created_at: now_epoch_ms(),
            eisenhower_evaluation,
        };

        let id = self.repo.insert_task(&new_task)?;
        Ok(new_task.into_task(id))
    }

    /// Applies a partial update to an existing task.
    ///
    /// # Contract
    /// - Fails `NotFound` before any field processing when the id is
    ///   unknown.
    /// - Fails `EmptyUpdate` when no recognized key is present; unknown
    ///   keys were already discarded at deserialization.
    /// - Field semantics and ordering are defined by
    ///   [`TaskPatch::apply_to`].
    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ServiceResult<Task> {
        let Some(mut task) = self.repo.get_task(id)? else {
            return Err(ServiceError::NotFound(id));
        };

        if patch.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }

        let outcome = patch.apply_to(&mut task);
        if outcome.evaluation_skipped {
            warn!(
                "event=task_update module=service status=skip field=eisenhower_evaluation task_id={id}"
            );
        }

        self.repo.update_task(&task)?;
        Ok(task)
    }

    /// Flips a task's completion, deriving status from the new flag.
    pub fn toggle_task(&self, id: TaskId) -> ServiceResult<Task> {
        let Some(mut task) = self.repo.get_task(id)? else {
            return Err(ServiceError::NotFound(id));
        };

        task.toggle();
        self.repo.update_task(&task)?;
        Ok(task)
    }

    /// Deletes a task irreversibly.
    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        self.repo.delete_task(id)?;
        Ok(())
    }

    /// Computes aggregate statistics over the full task set.
    pub fn compute_stats(&self) -> ServiceResult<StatsSummary> {
        let tasks = self.repo.list_tasks()?;
        Ok(aggregate(&tasks))
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
