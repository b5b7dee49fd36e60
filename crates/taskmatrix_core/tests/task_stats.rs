use rusqlite::Connection;
use serde_json::json;
use taskmatrix_core::db::open_db_in_memory;
use taskmatrix_core::{CreateTaskRequest, SqliteTaskRepository, Task, TaskService};

fn service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::new(conn))
}

fn create(
    service: &TaskService<SqliteTaskRepository<'_>>,
    title: &str,
    priority: &str,
    evaluation: Option<serde_json::Value>,
) -> Task {
    service
        .create_task(CreateTaskRequest {
            title: title.to_string(),
            priority: Some(priority.to_string()),
            eisenhower_evaluation: evaluation,
            ..CreateTaskRequest::default()
        })
        .unwrap()
}

#[test]
fn empty_store_yields_all_zero_stats() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let stats = service.compute_stats().unwrap();

    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.completed_tasks, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert_eq!(stats.priority_stats.low, 0);
    assert_eq!(stats.priority_stats.medium, 0);
    assert_eq!(stats.priority_stats.high, 0);
    assert_eq!(stats.status_stats.todo, 0);
    assert_eq!(stats.status_stats.inprogress, 0);
    assert_eq!(stats.status_stats.done, 0);
    assert_eq!(stats.eisenhower_stats.evaluated_tasks, 0);
}

#[test]
fn completion_rate_rounds_to_one_decimal() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = create(&service, "one", "medium", None);
    create(&service, "two", "medium", None);
    create(&service, "three", "medium", None);
    service.toggle_task(first.id).unwrap();

    let stats = service.compute_stats().unwrap();
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.completion_rate, 33.3);
}

#[test]
fn priority_and_status_buckets_are_counted() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    create(&service, "a", "high", None);
    create(&service, "b", "high", None);
    create(&service, "c", "low", None);
    let done = create(&service, "d", "medium", None);
    let moving = create(&service, "e", "medium", None);

    service.toggle_task(done.id).unwrap();
    service
        .update_task(
            moving.id,
            &serde_json::from_value(json!({ "status": "inprogress" })).unwrap(),
        )
        .unwrap();

    let stats = service.compute_stats().unwrap();
    assert_eq!(stats.priority_stats.high, 2);
    assert_eq!(stats.priority_stats.medium, 2);
    assert_eq!(stats.priority_stats.low, 1);
    assert_eq!(stats.status_stats.todo, 3);
    assert_eq!(stats.status_stats.inprogress, 1);
    assert_eq!(stats.status_stats.done, 1);
}

#[test]
fn evaluated_tasks_and_quadrants_are_counted() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    create(
        &service,
        "q1",
        "medium",
        Some(json!({ "isUrgent": true, "isImportant": true })),
    );
    create(
        &service,
        "q2",
        "medium",
        Some(json!({ "isUrgent": false, "isImportant": true })),
    );
    create(
        &service,
        "q3",
        "medium",
        Some(json!({ "isUrgent": true, "isImportant": false })),
    );
    create(&service, "q4", "medium", Some(json!({})));
    create(&service, "unclassified", "medium", None);

    let stats = service.compute_stats().unwrap();
    assert_eq!(stats.eisenhower_stats.evaluated_tasks, 4);
    assert_eq!(stats.eisenhower_stats.quadrants.urgent_important, 1);
    assert_eq!(stats.eisenhower_stats.quadrants.important_not_urgent, 1);
    assert_eq!(stats.eisenhower_stats.quadrants.urgent_not_important, 1);
    assert_eq!(stats.eisenhower_stats.quadrants.not_urgent_not_important, 1);
}

#[test]
fn undecodable_stored_evaluation_counts_as_evaluated_but_not_classified() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let task = create(&service, "corrupt", "medium", None);
    conn.execute(
        "UPDATE tasks SET eisenhower_evaluation = '{not json' WHERE id = ?1;",
        [task.id],
    )
    .unwrap();

    let stats = service.compute_stats().unwrap();
    assert_eq!(stats.eisenhower_stats.evaluated_tasks, 1);
    assert_eq!(stats.eisenhower_stats.quadrants.urgent_important, 0);
    assert_eq!(stats.eisenhower_stats.quadrants.important_not_urgent, 0);
    assert_eq!(stats.eisenhower_stats.quadrants.urgent_not_important, 0);
    assert_eq!(stats.eisenhower_stats.quadrants.not_urgent_not_important, 0);

    // The corrupt payload is also hidden from the serialized record.
    let listed = service.list_tasks().unwrap().remove(0);
    let encoded = serde_json::to_value(&listed).unwrap();
    assert!(encoded.get("eisenhowerEvaluation").is_none());
}

#[test]
fn stats_payload_serializes_with_all_keys_present() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let encoded = serde_json::to_value(service.compute_stats().unwrap()).unwrap();

    for key in ["total_tasks", "completed_tasks", "completion_rate"] {
        assert!(encoded.get(key).is_some(), "missing key {key}");
    }
    for key in ["low", "medium", "high"] {
        assert!(encoded["priority_stats"].get(key).is_some());
    }
    for key in ["todo", "inprogress", "done"] {
        assert!(encoded["status_stats"].get(key).is_some());
    }
    for key in [
        "urgent_important",
        "important_not_urgent",
        "urgent_not_important",
        "not_urgent_not_important",
    ] {
        assert!(encoded["eisenhower_stats"]["quadrants"].get(key).is_some());
    }
}
