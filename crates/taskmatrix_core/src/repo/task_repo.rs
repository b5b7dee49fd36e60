//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Listing order is a stable total order: priority rank descending,
//!   then `created_at` descending, then rowid descending.
//! - An undecodable stored evaluation is surfaced as
//!   `EvaluationState::Undecodable`, never silently dropped or repaired.

use crate::db::DbError;
use crate::model::eisenhower::EvaluationState;
use crate::model::task::{NewTask, Priority, Status, Task, TaskId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    priority,
    due_date,
    estimated_duration,
    start_deadline,
    status,
    completed,
    created_at,
    eisenhower_evaluation
FROM tasks";

const TASK_ORDER_SQL: &str = "ORDER BY
    CASE priority
        WHEN 'high' THEN 3
        WHEN 'medium' THEN 2
        WHEN 'low' THEN 1
    END DESC,
    created_at DESC,
    id DESC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store contract consumed by the service layer.
///
/// Every operation is assumed atomic; same-id serialization is provided
/// by SQLite's locking, not by this layer.
pub trait TaskRepository {
    fn insert_task(&self, task: &NewTask) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &NewTask) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO tasks (
                title,
                description,
                priority,
                due_date,
                estimated_duration,
                start_deadline,
                status,
                completed,
                created_at,
                eisenhower_evaluation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.priority.as_str(),
                task.due_date.as_deref(),
                task.estimated_duration,
                task.start_deadline.as_deref(),
                task.status.as_str(),
                bool_to_int(task.completed),
                task.created_at,
                evaluation_to_db(&task.eisenhower_evaluation)?,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                priority = ?3,
                due_date = ?4,
                estimated_duration = ?5,
                start_deadline = ?6,
                status = ?7,
                completed = ?8,
                eisenhower_evaluation = ?9
             WHERE id = ?10;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.priority.as_str(),
                task.due_date.as_deref(),
                task.estimated_duration,
                task.start_deadline.as_deref(),
                task.status.as_str(),
                bool_to_int(task.completed),
                evaluation_to_db(&task.eisenhower_evaluation)?,
                task.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} {TASK_ORDER_SQL};"))?;

        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    // Rows written before the workflow migration backfill may carry a NULL
    // status; derive it from the completed flag so the invariant holds.
    let status = match row.get::<_, Option<String>>("status")? {
        Some(value) => Status::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid status `{value}` in tasks.status"))
        })?,
        None => Status::from_completed(completed),
    };

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        due_date: row.get("due_date")?,
        estimated_duration: row.get("estimated_duration")?,
        start_deadline: row.get("start_deadline")?,
        status,
        completed,
        created_at: row.get("created_at")?,
        eisenhower_evaluation: EvaluationState::from_stored(
            row.get("eisenhower_evaluation")?,
        ),
    })
}

fn evaluation_to_db(evaluation: &EvaluationState) -> RepoResult<Option<String>> {
    match evaluation {
        EvaluationState::Absent => Ok(None),
        EvaluationState::Valid(value) => serde_json::to_string(value).map(Some).map_err(|err| {
            RepoError::InvalidData(format!("evaluation payload not serializable: {err}"))
        }),
        EvaluationState::Undecodable(raw) => Ok(Some(raw.clone())),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
