//! Repository trait for employee documents.
//!
//! Operations return boxed futures so the repository can be held as a
//! trait object in the application state and swapped for a fake in tests.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{EmpId, Employee, EmployeeTasks, Task};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone)]
pub enum RepositoryError {
    /// An employee with the same identifier already exists.
    #[error("Duplicate employee: {0}")]
    Duplicate(EmpId),

    /// Database connection error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Future returned by repository operations.
pub type RepositoryFuture<'a, T> = BoxFuture<'a, Result<T, RepositoryError>>;

// =============================================================================
// Update Outcome
// =============================================================================

/// Result of an update against a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Number of documents matched by the filter.
    pub matched_count: u64,
    /// Number of documents whose content actually changed.
    pub modified_count: u64,
}

impl UpdateOutcome {
    /// Outcome of an update whose filter matched nothing.
    #[must_use]
    pub const fn unmatched() -> Self {
        Self {
            matched_count: 0,
            modified_count: 0,
        }
    }

    /// Outcome of an update that matched one document.
    #[must_use]
    pub const fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: if modified { 1 } else { 0 },
        }
    }

    /// Returns true if at least one document changed.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified_count > 0
    }
}

// =============================================================================
// Employee Repository
// =============================================================================

/// Repository trait for employee documents.
///
/// Each method touches exactly one document. There is no cross-document
/// transaction and no version check: concurrent writers to the same
/// employee are last-write-wins.
pub trait EmployeeRepository: Send + Sync {
    /// Finds a full employee document.
    ///
    /// Returns `Ok(None)` if no document has this `empId`.
    fn find_by_emp_id(&self, emp_id: EmpId) -> RepositoryFuture<'_, Option<Employee>>;

    /// Finds the `{ empId, todo, done }` projection of a document.
    fn find_tasks(&self, emp_id: EmpId) -> RepositoryFuture<'_, Option<EmployeeTasks>>;

    /// Appends a task to the end of `todo`.
    fn push_todo(&self, emp_id: EmpId, task: Task) -> RepositoryFuture<'_, UpdateOutcome>;

    /// Overwrites both task arrays.
    fn replace_tasks(
        &self,
        emp_id: EmpId,
        todo: Vec<Task>,
        done: Vec<Task>,
    ) -> RepositoryFuture<'_, UpdateOutcome>;

    /// Inserts a new employee document. Used for seeding only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the `empId` is taken.
    fn insert(&self, employee: Employee) -> RepositoryFuture<'_, ()>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_update_outcome_constructors() {
        assert!(!UpdateOutcome::unmatched().is_modified());
        assert_eq!(UpdateOutcome::unmatched().matched_count, 0);

        let outcome = UpdateOutcome::matched(true);
        assert_eq!(outcome.matched_count, 1);
        assert!(outcome.is_modified());

        let outcome = UpdateOutcome::matched(false);
        assert_eq!(outcome.matched_count, 1);
        assert!(!outcome.is_modified());
    }

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::Duplicate(EmpId::new(1007));
        assert_eq!(format!("{error}"), "Duplicate employee: 1007");

        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");
    }
}
