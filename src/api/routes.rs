//! Routing definitions for the Nodebucket API.

use axum::Router;
use axum::routing::{delete, get};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::handle_panic;
use super::handlers::{AppState, health_check, method_not_allowed, route_not_found};
use super::query::{find_all_tasks, find_employee_by_id};
use super::tasks::{create_task, delete_task, replace_tasks};

/// Prefix under which the employee routes are mounted.
pub const API_PREFIX: &str = "/api";

/// Creates the application router with all routes and middleware.
///
/// ```ignore
/// let router = create_router(AppState::new(repository));
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    let employees = Router::new()
        .route("/employees/{emp_id}", get(find_employee_by_id))
        .route(
            "/employees/{emp_id}/tasks",
            get(find_all_tasks).post(create_task).put(replace_tasks),
        )
        .route("/employees/{emp_id}/tasks/{task_id}", delete(delete_task));

    Router::new()
        .route("/health", get(health_check))
        .nest(API_PREFIX, employees)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// The client is served from another origin during development.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

// =============================================================================
// Tests
// =============================================================================
