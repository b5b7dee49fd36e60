use rusqlite::Connection;
use serde_json::json;
use taskmatrix_core::db::open_db_in_memory;
use taskmatrix_core::{
    CreateTaskRequest, EvaluationState, Priority, ServiceError, SqliteTaskRepository, Status, Task,
    TaskPatch, TaskService,
};

fn service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::new(conn))
}

fn patch(payload: serde_json::Value) -> TaskPatch {
    serde_json::from_value(payload).unwrap()
}

fn seeded_task(service: &TaskService<SqliteTaskRepository<'_>>) -> Task {
    service
        .create_task(CreateTaskRequest {
            title: "seed".to_string(),
            description: Some("original".to_string()),
            priority: Some("high".to_string()),
            due_date: Some("2026-03-01".to_string()),
            estimated_duration: Some(1.5),
            ..CreateTaskRequest::default()
        })
        .unwrap()
}

#[test]
fn absent_keys_leave_fields_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let updated = service
        .update_task(task.id, &patch(json!({ "title": "renamed" })))
        .unwrap();

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.description, "original");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.due_date.as_deref(), Some("2026-03-01"));
    assert_eq!(updated.estimated_duration, Some(1.5));
    assert_eq!(updated.created_at, task.created_at);
}

#[test]
fn explicit_null_clears_optional_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let updated = service
        .update_task(
            task.id,
            &patch(json!({ "dueDate": null, "estimatedDuration": null, "description": null })),
        )
        .unwrap();

    assert_eq!(updated.due_date, None);
    assert_eq!(updated.estimated_duration, None);
    assert_eq!(updated.description, "");
}

#[test]
fn invalid_priority_is_silently_ignored() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let updated = service
        .update_task(
            task.id,
            &patch(json!({ "priority": "urgent", "title": "still applied" })),
        )
        .unwrap();

    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.title, "still applied");
}

#[test]
fn invalid_status_is_silently_ignored() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let updated = service
        .update_task(task.id, &patch(json!({ "status": "cancelled" })))
        .unwrap();

    assert_eq!(updated.status, Status::Todo);
    assert!(!updated.completed);
}

#[test]
fn completed_update_forces_matching_status() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let done = service
        .update_task(task.id, &patch(json!({ "completed": true })))
        .unwrap();
    assert_eq!(done.status, Status::Done);
    assert!(done.completed);

    let reopened = service
        .update_task(task.id, &patch(json!({ "completed": false })))
        .unwrap();
    assert_eq!(reopened.status, Status::Todo);
    assert!(!reopened.completed);
}

#[test]
fn status_update_forces_matching_completed() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let done = service
        .update_task(task.id, &patch(json!({ "status": "done" })))
        .unwrap();
    assert!(done.completed);

    let in_progress = service
        .update_task(task.id, &patch(json!({ "status": "inprogress" })))
        .unwrap();
    assert_eq!(in_progress.status, Status::InProgress);
    assert!(!in_progress.completed);
}

#[test]
fn status_wins_when_sent_alongside_completed() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let updated = service
        .update_task(
            task.id,
            &patch(json!({ "completed": true, "status": "todo" })),
        )
        .unwrap();

    assert_eq!(updated.status, Status::Todo);
    assert!(!updated.completed);
}

#[test]
fn empty_payload_is_rejected_and_nothing_persists() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let err = service.update_task(task.id, &patch(json!({}))).unwrap_err();
    assert!(matches!(err, ServiceError::EmptyUpdate));

    let err = service
        .update_task(task.id, &patch(json!({ "unknownKey": 1, "another": "x" })))
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmptyUpdate));

    let stored = service.list_tasks().unwrap().remove(0);
    assert_eq!(stored, task);
}

#[test]
fn not_found_is_checked_before_payload_validation() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    // Even an empty payload reports NotFound for an unknown id.
    let err = service.update_task(123, &patch(json!({}))).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(123)));

    let err = service
        .update_task(123, &patch(json!({ "title": "ghost" })))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(123)));
}

#[test]
fn evaluation_can_be_set_and_updated() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    let updated = service
        .update_task(
            task.id,
            &patch(json!({
                "eisenhowerEvaluation": { "isUrgent": true, "isImportant": false, "note": "q3" }
            })),
        )
        .unwrap();

    assert_eq!(
        updated.eisenhower_evaluation,
        EvaluationState::Valid(json!({ "isUrgent": true, "isImportant": false, "note": "q3" }))
    );
}

#[test]
fn falsy_evaluation_clears_the_stored_payload() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    service
        .update_task(
            task.id,
            &patch(json!({ "eisenhowerEvaluation": { "isUrgent": true } })),
        )
        .unwrap();

    for falsy in [json!(null), json!(false), json!(""), json!({})] {
        service
            .update_task(
                task.id,
                &patch(json!({ "eisenhowerEvaluation": { "isUrgent": true } })),
            )
            .unwrap();
        let cleared = service
            .update_task(task.id, &patch(json!({ "eisenhowerEvaluation": falsy })))
            .unwrap();
        assert_eq!(cleared.eisenhower_evaluation, EvaluationState::Absent);
    }
}

#[test]
fn unrelated_update_preserves_an_undecodable_stored_evaluation() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    conn.execute(
        "UPDATE tasks SET eisenhower_evaluation = '{broken' WHERE id = ?1;",
        [task.id],
    )
    .unwrap();

    let updated = service
        .update_task(task.id, &patch(json!({ "title": "still broken blob" })))
        .unwrap();
    assert_eq!(
        updated.eisenhower_evaluation,
        EvaluationState::Undecodable("{broken".to_string())
    );

    let stored: String = conn
        .query_row(
            "SELECT eisenhower_evaluation FROM tasks WHERE id = ?1;",
            [task.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "{broken");
}

#[test]
fn update_keeps_the_status_completion_invariant() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let task = seeded_task(&service);

    for payload in [
        json!({ "completed": true }),
        json!({ "status": "inprogress" }),
        json!({ "completed": false, "status": "done" }),
        json!({ "title": "untouched pair" }),
    ] {
        let updated = service.update_task(task.id, &patch(payload)).unwrap();
        assert_eq!(updated.completed, updated.status == Status::Done);
    }
}
