//! Error bodies returned by the HTTP layer.
//!
//! Every failure leaves the service as
//! `{ "status", "code", "message", "details"? }`, whatever its origin.

use std::any::Any;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::EmpIdParseError;
use crate::infrastructure::RepositoryError;

// =============================================================================
// API Error
// =============================================================================

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Numeric status, mirrored from the response line.
    pub status: u16,
    /// Stable machine-readable code such as `NOT_FOUND`.
    pub code: String,
    /// Text meant for people.
    pub message: String,
    /// Only present for payload validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Builds a body without details.
    #[must_use]
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Builds a `VALIDATION_ERROR` body listing each violation.
    #[must_use]
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            details: Some(details),
            ..Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
    }
}

/// One violation inside a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path of the offending value (`/text`, `/todo/0/_id`, empty for the body itself).
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Pairs a path with a message.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// A status plus the body to send with it.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Combines a status and a body.
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// 400 with a custom code.
    #[must_use]
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::new(StatusCode::BAD_REQUEST, code, message),
        )
    }

    /// 400 `VALIDATION_ERROR` carrying details.
    #[must_use]
    pub fn validation_error(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation(message, details),
        )
    }

    /// 404 `NOT_FOUND`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
        )
    }

    /// 405 `METHOD_NOT_ALLOWED`.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED", message),
        )
    }

    /// 500 `INTERNAL_ERROR`.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let Self { status, error } = self;
        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for ApiErrorResponse {
    fn from(error: RepositoryError) -> Self {
        // Storage details stay in the log.
        tracing::error!(%error, "Repository operation failed");
        Self::internal_error("An internal error occurred")
    }
}

impl From<EmpIdParseError> for ApiErrorResponse {
    fn from(error: EmpIdParseError) -> Self {
        tracing::warn!(input = %error.input, "Rejected non-numeric employee ID");
        Self::bad_request("INVALID_EMPLOYEE_ID", "Employee ID must be a number")
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(
            "Invalid task payload",
            vec![FieldError::new("", rejection.body_text())],
        )
    }
}

/// Turns a handler panic into the standard 500 body.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(detail, "Request handler panicked");
    ApiErrorResponse::internal_error("An internal error occurred").into_response()
}

// =============================================================================
// Validation Error
// =============================================================================

/// Every schema violation found in one request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Violations in document order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Wraps a list of violations.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Wraps exactly one violation.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, message)])
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::validation_error("Invalid task payload", error.errors)
    }
}

// =============================================================================
// Tests
// =============================================================================
