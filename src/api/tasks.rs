//! Task-mutating endpoints.
//!
//! Every handler follows the same order: parse the employee id (400),
//! load the document (404), validate the body (400), then write.
//! Writes are single-document and last-write-wins.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use super::dto::{CreateTaskRequest, CreateTaskResponse, ReplaceTasksRequest};
use super::error::{ApiErrorResponse, ValidationError};
use super::handlers::{AppState, load_employee_tasks};
use crate::domain::{Task, TaskId};

/// Deserializes a body that already passed its schema.
fn decode_payload<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ValidationError> {
    serde_json::from_value(body).map_err(|error| ValidationError::single("", error.to_string()))
}

// =============================================================================
// POST /employees/{empId}/tasks
// =============================================================================

/// Appends a new task to the employee's `todo` list.
///
/// # Request Body
///
/// ```json
/// { "text": "file expense report" }
/// ```
///
/// # Response
///
/// - **201 Created**: `{ "id": "<generated>" }`
/// - **400 Bad Request**: bad identifier, invalid payload, or nothing was written
/// - **404 Not Found**: no such employee
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] as listed above, or 500 if the repository fails.
pub async fn create_task(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTaskResponse>), ApiErrorResponse> {
    let employee = load_employee_tasks(&state, &emp_id).await?;
    let emp_id = employee.emp_id;

    let Json(body) = payload?;
    if let Err(error) = state.schemas.create_task.validate(&body) {
        tracing::warn!(%emp_id, violations = error.errors.len(), "Invalid task payload");
        return Err(error.into());
    }
    let request: CreateTaskRequest = decode_payload(body)?;

    let task = Task::new(state.task_id_generator.generate(), request.text);
    let task_id = task.task_id.clone();

    let outcome = state.employee_repository.push_todo(emp_id, task).await?;
    if !outcome.is_modified() {
        tracing::warn!(%emp_id, "Task push modified no document");
        return Err(ApiErrorResponse::bad_request(
            "TASK_NOT_CREATED",
            "Unable to create task",
        ));
    }

    tracing::info!(%emp_id, %task_id, "Task created");
    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            id: task_id.to_string(),
        }),
    ))
}

// =============================================================================
// PUT /employees/{empId}/tasks
// =============================================================================

/// Overwrites both task lists with the request body.
///
/// There is no merge: to reorder or move a task between lists the caller
/// sends both complete lists.
///
/// # Request Body
///
/// ```json
/// { "todo": [{ "_id": "...", "text": "..." }], "done": [] }
/// ```
///
/// # Errors
///
/// - 400 for a bad identifier or invalid payload
/// - 404 if no document matches
pub async fn replace_tasks(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiErrorResponse> {
    let employee = load_employee_tasks(&state, &emp_id).await?;
    let emp_id = employee.emp_id;

    let Json(body) = payload?;
    if let Err(error) = state.schemas.replace_tasks.validate(&body) {
        tracing::warn!(%emp_id, violations = error.errors.len(), "Invalid tasks payload");
        return Err(error.into());
    }
    let request: ReplaceTasksRequest = decode_payload(body)?;

    let todo: Vec<Task> = request.todo.into_iter().map(Task::from).collect();
    let done: Vec<Task> = request.done.into_iter().map(Task::from).collect();
    let (todo_count, done_count) = (todo.len(), done.len());

    let outcome = state
        .employee_repository
        .replace_tasks(emp_id, todo, done)
        .await?;

    tracing::info!(
        %emp_id,
        todo = todo_count,
        done = done_count,
        modified = outcome.is_modified(),
        "Tasks replaced"
    );
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// DELETE /employees/{empId}/tasks/{taskId}
// =============================================================================

/// Removes every item with the given id from both lists.
///
/// Deleting an id that is in neither list succeeds without changes.
///
/// # Errors
///
/// - 400 for a bad identifier
/// - 404 if no document matches
pub async fn delete_task(
    State(state): State<AppState>,
    Path((emp_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiErrorResponse> {
    let employee = load_employee_tasks(&state, &emp_id).await?;
    let emp_id = employee.emp_id;
    let task_id = TaskId::new(task_id);

    let (todo, done) = employee.without_task(&task_id);
    let outcome = state
        .employee_repository
        .replace_tasks(emp_id, todo, done)
        .await?;

    tracing::info!(%emp_id, %task_id, removed = outcome.is_modified(), "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Tests
// =============================================================================
