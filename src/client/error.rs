//! Client-side error type.

use thiserror::Error;

use super::session::INVALID_EMPLOYEE_ID_MESSAGE;
use crate::domain::TaskId;

/// Errors surfaced by the client view-model.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The sign-in input is not an all-digit identifier.
    #[error("{}", INVALID_EMPLOYEE_ID_MESSAGE)]
    InvalidEmployeeId {
        /// The rejected input.
        input: String,
    },

    /// The configured server address cannot carry API paths.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or the status reason.
        message: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The task is on neither list of the board.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A new task needs some text.
    #[error("task text must not be empty")]
    EmptyTaskText,
}

impl ClientError {
    /// Returns the HTTP status for server-side failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
