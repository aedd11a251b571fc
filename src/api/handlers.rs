//! Shared handler plumbing for the Nodebucket API.
//!
//! Holds the application state, the health and fallback handlers, and the
//! employee lookup every task endpoint starts with.

use std::sync::Arc;

use axum::{
    Json,
    http::{Method, Uri},
};

use super::error::ApiErrorResponse;
use super::schema::TaskSchemas;
use crate::domain::{EmpId, EmployeeTasks, TaskIdGenerator, UuidTaskIdGenerator};
use crate::infrastructure::EmployeeRepository;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Everything a handler touches is passed in here; there are no
/// process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    /// Employee document storage.
    pub employee_repository: Arc<dyn EmployeeRepository>,
    /// Source of identifiers for new tasks.
    pub task_id_generator: Arc<dyn TaskIdGenerator>,
    /// Request body schemas, built once.
    pub schemas: Arc<TaskSchemas>,
}

impl AppState {
    /// Creates a state with UUID task identifiers.
    #[must_use]
    pub fn new(employee_repository: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            employee_repository,
            task_id_generator: Arc::new(UuidTaskIdGenerator),
            schemas: Arc::new(TaskSchemas::new()),
        }
    }

    /// Replaces the task identifier generator.
    #[must_use]
    pub fn with_task_id_generator(mut self, generator: Arc<dyn TaskIdGenerator>) -> Self {
        self.task_id_generator = generator;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("employee_repository", &"<dyn EmployeeRepository>")
            .field("task_id_generator", &"<dyn TaskIdGenerator>")
            .field("schemas", &self.schemas)
            .finish()
    }
}

// =============================================================================
// Employee Lookup
// =============================================================================

/// Message returned whenever an employee document is missing.
pub(crate) fn employee_not_found(emp_id: EmpId) -> ApiErrorResponse {
    tracing::warn!(%emp_id, "Employee not found");
    ApiErrorResponse::not_found(format!("Employee not found with empId {emp_id}"))
}

/// Parses the path identifier and loads the task projection.
///
/// # Errors
///
/// - 400 if `raw_emp_id` is not a number
/// - 404 if no document has this identifier
/// - 500 if the repository fails
pub(crate) async fn load_employee_tasks(
    state: &AppState,
    raw_emp_id: &str,
) -> Result<EmployeeTasks, ApiErrorResponse> {
    let emp_id = EmpId::parse(raw_emp_id)?;
    tracing::debug!(%emp_id, "Loading employee tasks");

    state
        .employee_repository
        .find_tasks(emp_id)
        .await?
        .ok_or_else(|| employee_not_found(emp_id))
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Fallback Handler
// =============================================================================

/// Answers unknown routes with the standard JSON error body.
pub async fn route_not_found(uri: Uri) -> ApiErrorResponse {
    tracing::debug!(%uri, "No route matched");
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}

/// Answers a known path hit with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiErrorResponse {
    tracing::debug!(%method, %uri, "Method not allowed");
    ApiErrorResponse::method_not_allowed(format!("{method} is not supported on {}", uri.path()))
}

// =============================================================================
// Tests
// =============================================================================
