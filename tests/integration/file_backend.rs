// Test-specific lint overrides: integration tests use unwrap/expect freely,
// and some pedantic/nursery lints are not appropriate for test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::future_not_send,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Integration tests for the JSON file backend.
//!
//! Covers the on-disk format, the "file must already exist" rule, and that
//! storage failures reach clients as `500` with a fixed message only.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use taskd_proto::api::TaskFields;
use taskd_proto::task::{Task, TaskId};
use taskd_server::backend::{JsonFileBackend, TaskBackend};
use taskd_server::server;
use taskd_server::store::{StoreError, TaskStore};
use tower::ServiceExt;

async fn status_and_message(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, body["message"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn save_writes_pretty_two_space_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let backend = JsonFileBackend::new(&path);

    backend
        .save(&[Task::new(TaskId::new("1"), "A", "a")])
        .await
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "[\n  {\n    \"id\": \"1\",\n    \"title\": \"A\",\n    \"description\": \"a\"\n  }\n]"
    );
    assert_eq!(backend.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_file_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let store = TaskStore::new(JsonFileBackend::new(&path));

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Read { .. }), "got {err:?}");
    let err = store.create(TaskFields::new("A", "a")).await.unwrap_err();
    assert!(err.is_storage());
    assert!(!path.exists());
}

#[tokio::test]
async fn malformed_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "{ \"not\": \"an array\" }").unwrap();
    let backend = JsonFileBackend::new(&path);

    let err = backend.load().await.unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn validation_failure_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let original = "[ { \"id\": \"1\", \"title\": \"A\", \"description\": \"a\" } ]";
    std::fs::write(&path, original).unwrap();
    let store = TaskStore::new(JsonFileBackend::new(&path));

    assert!(store.create(TaskFields::new("", "x")).await.is_err());
    assert!(store.update("1", TaskFields::new("B", "")).await.is_err());

    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[tokio::test]
async fn unknown_members_survive_create_update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"[
            { "id": "1", "title": "A", "description": "a", "completed": true },
            { "id": "2", "title": "B", "description": "b", "tags": ["x"] }
        ]"#,
    )
    .unwrap();
    let store = TaskStore::new(JsonFileBackend::new(&path));
    let read = || -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap()
    };

    store.create(TaskFields::new("C", "c")).await.unwrap();
    assert_eq!(read()[0]["completed"], true);
    assert_eq!(read()[1]["tags"], serde_json::json!(["x"]));

    let updated = store
        .update("1", TaskFields::new("A2", "a2"))
        .await
        .unwrap();
    assert_eq!(updated.extra["completed"], true);
    assert_eq!(
        read()[0],
        serde_json::json!({ "id": "1", "title": "A2", "description": "a2", "completed": true })
    );

    store.delete("2").await.unwrap();
    assert_eq!(read()[0]["completed"], true);
    assert!(read()[1].get("completed").is_none());
}

#[tokio::test]
async fn missing_file_is_500_with_safe_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let app = server::router(Arc::new(TaskStore::new(JsonFileBackend::new(&path))));

    let request = Request::builder().uri("/task").body(Body::empty()).unwrap();
    let (status, message) = status_and_message(app.clone(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Error reading tasks");

    let request = Request::builder().uri("/task/1").body(Body::empty()).unwrap();
    let (status, message) = status_and_message(app.clone(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Error reading task");

    let request = Request::builder()
        .method("DELETE")
        .uri("/task/1")
        .body(Body::empty())
        .unwrap();
    let (status, message) = status_and_message(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Error deleting task");
}

#[tokio::test]
async fn malformed_file_is_500_on_create_and_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "not json at all").unwrap();
    let app = server::router(Arc::new(TaskStore::new(JsonFileBackend::new(&path))));

    let body = serde_json::json!({ "title": "A", "description": "a" }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/task")
        .header("content-type", "application/json")
        .body(Body::from(body.clone()))
        .unwrap();
    let (status, message) = status_and_message(app.clone(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Error creating task");
    assert!(!message.contains("tasks.json"));

    let request = Request::builder()
        .method("PUT")
        .uri("/task/1")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, message) = status_and_message(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Error updating task");
}
