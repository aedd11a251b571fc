//! HTTP surface of the Nodebucket service.
//!
//! # Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | [`health_check`] |
//! | GET | `/api/employees/{empId}` | [`find_employee_by_id`] |
//! | GET | `/api/employees/{empId}/tasks` | [`find_all_tasks`] |
//! | POST | `/api/employees/{empId}/tasks` | [`create_task`] |
//! | PUT | `/api/employees/{empId}/tasks` | [`replace_tasks`] |
//! | DELETE | `/api/employees/{empId}/tasks/{taskId}` | [`delete_task`] |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod query;
pub mod routes;
pub mod schema;
pub mod tasks;

pub use dto::{
    CreateTaskRequest, CreateTaskResponse, EmployeeResponse, ReplaceTasksRequest, TaskDto,
    TasksResponse,
};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError, handle_panic};
pub use handlers::{
    AppState, HealthResponse, health_check, method_not_allowed, route_not_found,
};
pub use query::{find_all_tasks, find_employee_by_id};
pub use routes::{API_PREFIX, create_router};
pub use schema::{ObjectSchema, TaskSchemas, ValueSchema};
pub use tasks::{create_task, delete_task, replace_tasks};
