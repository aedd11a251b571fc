//! Data Transfer Objects for API requests and responses.
//!
//! These types are the wire contract shared by the handlers and the
//! client view-model.

use serde::{Deserialize, Serialize};

use crate::domain::{EmpId, Employee, EmployeeTasks, Task, TaskId};

// =============================================================================
// Task DTOs
// =============================================================================

/// A task item as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    /// Task identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Task text.
    pub text: String,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.task_id.to_string(),
            text: task.text.clone(),
        }
    }
}

impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        Self::new(TaskId::new(dto.id), dto.text)
    }
}

/// Request body of `POST /employees/{empId}/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Text of the new task.
    pub text: String,
}

/// Response body of `POST /employees/{empId}/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    /// Identifier assigned to the new task.
    pub id: String,
}

/// Request body of `PUT /employees/{empId}/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceTasksRequest {
    /// Complete new `todo` list.
    pub todo: Vec<TaskDto>,
    /// Complete new `done` list.
    pub done: Vec<TaskDto>,
}

/// Response body of `GET /employees/{empId}/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksResponse {
    /// Employee identifier.
    pub emp_id: i64,
    /// Open tasks.
    #[serde(default)]
    pub todo: Vec<TaskDto>,
    /// Finished tasks.
    #[serde(default)]
    pub done: Vec<TaskDto>,
}

impl From<&EmployeeTasks> for TasksResponse {
    fn from(tasks: &EmployeeTasks) -> Self {
        Self {
            emp_id: tasks.emp_id.value(),
            todo: tasks.todo.iter().map(TaskDto::from).collect(),
            done: tasks.done.iter().map(TaskDto::from).collect(),
        }
    }
}

// =============================================================================
// Employee DTOs
// =============================================================================

/// Response body of `GET /employees/{empId}`: the full document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    /// Employee identifier.
    pub emp_id: i64,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Open tasks.
    #[serde(default)]
    pub todo: Vec<TaskDto>,
    /// Finished tasks.
    #[serde(default)]
    pub done: Vec<TaskDto>,
    /// Remaining document fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<&Employee> for EmployeeResponse {
    fn from(employee: &Employee) -> Self {
        Self {
            emp_id: employee.emp_id.value(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            todo: employee.todo.iter().map(TaskDto::from).collect(),
            done: employee.done.iter().map(TaskDto::from).collect(),
            extra: employee.extra.clone(),
        }
    }
}

impl EmployeeResponse {
    /// Returns the employee identifier.
    #[must_use]
    pub const fn emp_id(&self) -> EmpId {
        EmpId::new(self.emp_id)
    }

    /// Returns `"{first} {last}"`, skipping missing parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// =============================================================================
// Tests
// =============================================================================
