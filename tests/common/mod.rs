//! Common test helpers for integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{create_test_app, send_json};
//! ```
//!
//! # Note
//!
//! Each integration test file is compiled as a separate crate, so helpers
//! used by only some of them would otherwise trigger dead code warnings.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use nodebucket::api::{AppState, create_router};
use nodebucket::domain::{EmpId, Employee, SequentialTaskIdGenerator, Task, TaskId};
use nodebucket::infrastructure::InMemoryEmployeeRepository;

/// Identifier of the seeded employee.
pub const EMP_ID: i64 = 1007;

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// The employee every test app starts with.
pub fn seeded_employee() -> Employee {
    Employee::new(EmpId::new(EMP_ID))
        .with_name("Ada", "Lovelace")
        .with_todo(vec![
            Task::new(TaskId::new("t1"), "Draft the quarterly report"),
            Task::new(TaskId::new("t2"), "Review pull requests"),
        ])
        .with_done(vec![Task::new(TaskId::new("d1"), "Set up workstation")])
}

/// A repository holding [`seeded_employee`].
pub fn create_test_repository() -> Arc<InMemoryEmployeeRepository> {
    Arc::new(InMemoryEmployeeRepository::with_employees(vec![
        seeded_employee(),
    ]))
}

/// An `AppState` over `repository` with `task-N` identifiers.
pub fn create_test_app_state(repository: Arc<InMemoryEmployeeRepository>) -> AppState {
    AppState::new(repository).with_task_id_generator(Arc::new(SequentialTaskIdGenerator::new()))
}

/// A router over a fresh seeded repository.
pub fn create_test_app() -> Router {
    create_router(create_test_app_state(create_test_repository()))
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends one request and returns the status and the decoded body.
///
/// An empty body decodes to `Value::Null`.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Sends a request without a body.
pub async fn send_empty(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Sends a JSON request.
pub async fn send_json(app: &Router, method: Method, uri: &str, body: &Value) -> (StatusCode, Value) {
    send_raw(app, method, uri, &body.to_string()).await
}

/// Sends a request with a JSON content type and an arbitrary body.
pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// `/api/employees/{emp_id}/tasks`
pub fn tasks_uri(emp_id: impl std::fmt::Display) -> String {
    format!("/api/employees/{emp_id}/tasks")
}

/// Collects the `_id` values of a task array.
pub fn task_ids(tasks: &Value) -> Vec<String> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["_id"].as_str().unwrap().to_string())
        .collect()
}
