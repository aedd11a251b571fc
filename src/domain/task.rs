//! Task domain model.
//!
//! A task is a `{ _id, text }` item embedded in one of an employee's
//! `todo`/`done` arrays. Identifiers are opaque strings: seeded documents
//! may carry any identifier format, new tasks receive one from a
//! [`TaskIdGenerator`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Opaque identifier of a task item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates a time-ordered identifier (UUID v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    #[must_use]
    pub fn generate_v7() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// Task Entity
// =============================================================================

/// A unit of work in an employee's `todo` or `done` list.
///
/// Serialized with the document-store field name `_id`; `id` is accepted
/// on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier of the task.
    #[serde(rename = "_id", alias = "id")]
    pub task_id: TaskId,
    /// Free-form task text.
    pub text: String,
}

impl Task {
    /// Creates a new task.
    #[must_use]
    pub fn new(task_id: TaskId, text: impl Into<String>) -> Self {
        Self {
            task_id,
            text: text.into(),
        }
    }

    /// Returns true if this task has the given identifier.
    #[must_use]
    pub fn has_id(&self, task_id: &TaskId) -> bool {
        self.task_id == *task_id
    }
}

/// Which of the two task arrays an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskList {
    Todo,
    Done,
}

impl std::fmt::Display for TaskList {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => formatter.write_str("todo"),
            Self::Done => formatter.write_str("done"),
        }
    }
}

// =============================================================================
// Identifier Generation
// =============================================================================

/// Source of fresh task identifiers.
///
/// Held by the application state so tests can swap in a deterministic
/// implementation.
pub trait TaskIdGenerator: Send + Sync {
    /// Returns an identifier that has not been handed out before.
    fn generate(&self) -> TaskId;
}

/// Generates UUID v7 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTaskIdGenerator;

impl TaskIdGenerator for UuidTaskIdGenerator {
    fn generate(&self) -> TaskId {
        TaskId::generate_v7()
    }
}

/// Generates `{prefix}-{n}` identifiers from a counter starting at 1.
#[derive(Debug)]
pub struct SequentialTaskIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialTaskIdGenerator {
    /// Creates a generator producing `task-1`, `task-2`, ...
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("task")
    }

    /// Creates a generator with a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialTaskIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskIdGenerator for SequentialTaskIdGenerator {
    fn generate(&self) -> TaskId {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        TaskId::new(format!("{}-{value}", self.prefix))
    }
}

// =============================================================================
// Tests
// =============================================================================
