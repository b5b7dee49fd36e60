//! Task domain record and partial-update payload.
//!
//! # Responsibility
//! - Define the canonical persisted task shape.
//! - Apply partial updates in a fixed, documented field order.
//!
//! # Invariants
//! - `completed == (status == Status::Done)` after every mutation helper.
//! - Patch application evaluates `completed` before `status`, so an
//!   explicit `status` always wins when both are supplied.
//! - Absent patch keys leave fields untouched; explicit nulls clear
//!   optional fields.

use crate::model::eisenhower::{is_falsy, EvaluationState};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Store-assigned identifier (SQLite rowid). Immutable after creation.
pub type TaskId = i64;

/// Task priority used for list ordering and stats bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parses a wire value; unknown strings yield `None` so callers can
    /// apply their own fallback policy.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Sort rank: higher priority sorts first in listings.
    pub fn rank(self) -> i64 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "inprogress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }

    /// The `completed` flag implied by this status.
    pub fn completed_flag(self) -> bool {
        matches!(self, Self::Done)
    }

    /// The status implied by a bare `completed` flag.
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Done
        } else {
            Self::Todo
        }
    }
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<String>,
    /// Caller-defined unit (hours or minutes); opaque to the core.
    pub estimated_duration: Option<f64>,
    pub start_deadline: Option<String>,
    pub status: Status,
    pub completed: bool,
    /// Unix epoch milliseconds, set once at creation.
    pub created_at: i64,
    #[serde(skip_serializing_if = "EvaluationState::is_hidden")]
    pub eisenhower_evaluation: EvaluationState,
}

impl Task {
    /// Sets the status and derives `completed` from it.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.completed = status.completed_flag();
    }

    /// Sets the completed flag and derives `status` from it.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.status = Status::from_completed(completed);
    }

    /// Flips completion, keeping status coupled.
    pub fn toggle(&mut self) {
        self.set_completed(!self.completed);
    }
}

/// Task fields known before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub estimated_duration: Option<f64>,
    pub start_deadline: Option<String>,
    pub status: Status,
    pub completed: bool,
    pub created_at: i64,
    pub eisenhower_evaluation: EvaluationState,
}

impl NewTask {
    /// Promotes the draft to a full record once the store assigned an id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            estimated_duration: self.estimated_duration,
            start_deadline: self.start_deadline,
            status: self.status,
            completed: self.completed,
            created_at: self.created_at,
            eisenhower_evaluation: self.eisenhower_evaluation,
        }
    }
}

/// Partial-update payload.
///
/// Outer `Option` answers "was the key present"; for clearable fields the
/// inner `Option` answers "was the value null". `priority` and `status`
/// stay raw strings because invalid values are silently ignored rather
/// than rejected, which a typed enum could not express.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "some")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "some")]
    pub estimated_duration: Option<Option<f64>>,
    #[serde(default, deserialize_with = "some")]
    pub start_deadline: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "some")]
    pub eisenhower_evaluation: Option<Value>,
}

/// Maps a present key to `Some`, so explicit JSON nulls survive as
/// `Some(None)` (or `Some(Value::Null)`) instead of collapsing to "absent".
fn some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Result of applying a patch; the skipped evaluation case is non-fatal
/// and reported so the caller can log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchOutcome {
    pub evaluation_skipped: bool,
}

impl TaskPatch {
    /// True when no recognized key was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.estimated_duration.is_none()
            && self.start_deadline.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.status.is_none()
            && self.eisenhower_evaluation.is_none()
    }

    /// Applies every supplied field to `task` in a fixed order.
    ///
    /// # Contract
    /// - Scalar fields replace verbatim; explicit nulls clear optionals.
    /// - Invalid `priority`/`status` values leave the stored value as-is.
    /// - `completed` is applied before `status`; both derive their
    ///   counterpart, so `status` wins when the payload carries both.
    /// - A falsy evaluation value clears the stored evaluation; a payload
    ///   that fails to re-serialize is skipped without aborting the rest.
    pub fn apply_to(&self, task: &mut Task) -> PatchOutcome {
        let mut outcome = PatchOutcome::default();

        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            // Explicit null resets the description to its empty default.
            task.description = description.clone().unwrap_or_default();
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(estimated_duration) = self.estimated_duration {
            task.estimated_duration = estimated_duration;
        }
        if let Some(start_deadline) = &self.start_deadline {
            task.start_deadline = start_deadline.clone();
        }
        if let Some(priority) = self.priority.as_deref().and_then(Priority::parse) {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.set_completed(completed);
        }
        if let Some(status) = self.status.as_deref().and_then(Status::parse) {
            task.set_status(status);
        }
        if let Some(evaluation) = &self.eisenhower_evaluation {
            if is_falsy(evaluation) {
                task.eisenhower_evaluation = EvaluationState::Absent;
            } else if serde_json::to_string(evaluation).is_ok() {
                task.eisenhower_evaluation = EvaluationState::Valid(evaluation.clone());
            } else {
                outcome.evaluation_skipped = true;
            }
        }

        outcome
    }
}
