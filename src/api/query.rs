//! Read-only employee endpoints.

use axum::{
    Json,
    extract::{Path, State},
};

use super::dto::{EmployeeResponse, TasksResponse};
use super::error::ApiErrorResponse;
use super::handlers::{AppState, employee_not_found, load_employee_tasks};
use crate::domain::EmpId;

// =============================================================================
// GET /employees/{empId}
// =============================================================================

/// Returns the full employee document.
///
/// Used by the client's sign-in flow, which has no credential check
/// beyond the document existing.
///
/// # Errors
///
/// - 400 if the identifier is not a number
/// - 404 if no document matches
pub async fn find_employee_by_id(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
) -> Result<Json<EmployeeResponse>, ApiErrorResponse> {
    let emp_id = EmpId::parse(&emp_id)?;

    let employee = state
        .employee_repository
        .find_by_emp_id(emp_id)
        .await?
        .ok_or_else(|| employee_not_found(emp_id))?;

    tracing::debug!(%emp_id, "Employee found");
    Ok(Json(EmployeeResponse::from(&employee)))
}

// =============================================================================
// GET /employees/{empId}/tasks
// =============================================================================

/// Returns the `{ empId, todo, done }` projection.
///
/// # Errors
///
/// - 400 if the identifier is not a number
/// - 404 if no document matches
pub async fn find_all_tasks(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
) -> Result<Json<TasksResponse>, ApiErrorResponse> {
    let tasks = load_employee_tasks(&state, &emp_id).await?;
    Ok(Json(TasksResponse::from(&tasks)))
}

// =============================================================================
// Tests
// =============================================================================
