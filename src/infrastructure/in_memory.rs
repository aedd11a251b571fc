//! In-memory repository implementation.
//!
//! Suitable for development, tests, and single-process deployments seeded
//! from a JSON file.
//!
//! # Features
//!
//! - Thread-safe with `Arc<RwLock<...>>`
//! - Each operation holds the lock for one document update, which gives the
//!   same single-document atomicity a document store provides

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;

use crate::domain::{EmpId, Employee, EmployeeTasks, Task};
use crate::infrastructure::{EmployeeRepository, RepositoryError, RepositoryFuture, UpdateOutcome};

// =============================================================================
// In-Memory Employee Repository
// =============================================================================

/// In-memory implementation of `EmployeeRepository`.
///
/// # Example
///
/// ```ignore
/// use nodebucket::infrastructure::InMemoryEmployeeRepository;
///
/// let repository = InMemoryEmployeeRepository::with_employees(vec![
///     Employee::new(EmpId::new(1007)).with_name("Ada", "Lovelace"),
/// ]);
/// let found = repository.find_by_emp_id(EmpId::new(1007)).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeRepository {
    employees: Arc<RwLock<HashMap<EmpId, Employee>>>,
}

impl InMemoryEmployeeRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with the given documents.
    ///
    /// Later documents overwrite earlier ones with the same `empId`.
    #[must_use]
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let employees = employees
            .into_iter()
            .map(|employee| (employee.emp_id, employee))
            .collect();
        Self {
            employees: Arc::new(RwLock::new(employees)),
        }
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.employees.read().await.len()
    }

    /// Returns true if no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.employees.read().await.is_empty()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl EmployeeRepository for InMemoryEmployeeRepository {
    fn find_by_emp_id(&self, emp_id: EmpId) -> RepositoryFuture<'_, Option<Employee>> {
        async move {
            let guard = self.employees.read().await;
            Ok(guard.get(&emp_id).cloned())
        }
        .boxed()
    }

    fn find_tasks(&self, emp_id: EmpId) -> RepositoryFuture<'_, Option<EmployeeTasks>> {
        async move {
            let guard = self.employees.read().await;
            Ok(guard.get(&emp_id).map(Employee::tasks))
        }
        .boxed()
    }

    fn push_todo(&self, emp_id: EmpId, task: Task) -> RepositoryFuture<'_, UpdateOutcome> {
        async move {
            let mut guard = self.employees.write().await;
            let Some(employee) = guard.get_mut(&emp_id) else {
                return Ok(UpdateOutcome::unmatched());
            };
            employee.todo.push(task);
            Ok(UpdateOutcome::matched(true))
        }
        .boxed()
    }

    fn replace_tasks(
        &self,
        emp_id: EmpId,
        todo: Vec<Task>,
        done: Vec<Task>,
    ) -> RepositoryFuture<'_, UpdateOutcome> {
        async move {
            let mut guard = self.employees.write().await;
            let Some(employee) = guard.get_mut(&emp_id) else {
                return Ok(UpdateOutcome::unmatched());
            };
            let modified = employee.todo != todo || employee.done != done;
            employee.todo = todo;
            employee.done = done;
            Ok(UpdateOutcome::matched(modified))
        }
        .boxed()
    }

    fn insert(&self, employee: Employee) -> RepositoryFuture<'_, ()> {
        async move {
            let mut guard = self.employees.write().await;
            if guard.contains_key(&employee.emp_id) {
                return Err(RepositoryError::Duplicate(employee.emp_id));
            }
            guard.insert(employee.emp_id, employee);
            Ok(())
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use rstest::{fixture, rstest};

    fn task(id: &str, text: &str) -> Task {
        Task::new(TaskId::new(id), text)
    }

    #[fixture]
    fn repository() -> InMemoryEmployeeRepository {
        InMemoryEmployeeRepository::with_employees(vec![
            Employee::new(EmpId::new(1007))
                .with_name("Ada", "Lovelace")
                .with_todo(vec![task("a", "first")])
                .with_done(vec![task("b", "second")]),
        ])
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_by_emp_id(repository: InMemoryEmployeeRepository) {
        let found = repository.find_by_emp_id(EmpId::new(1007)).await.unwrap();
        assert_eq!(found.unwrap().full_name(), "Ada Lovelace");

        let missing = repository.find_by_emp_id(EmpId::new(9999)).await.unwrap();
        assert!(missing.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_tasks_projection(repository: InMemoryEmployeeRepository) {
        let tasks = repository
            .find_tasks(EmpId::new(1007))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tasks.emp_id, EmpId::new(1007));
        assert_eq!(tasks.todo, vec![task("a", "first")]);
        assert_eq!(tasks.done, vec![task("b", "second")]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_push_todo_appends(repository: InMemoryEmployeeRepository) {
        let outcome = repository
            .push_todo(EmpId::new(1007), task("c", "third"))
            .await
            .unwrap();
        assert!(outcome.is_modified());

        let tasks = repository
            .find_tasks(EmpId::new(1007))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tasks.todo, vec![task("a", "first"), task("c", "third")]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_push_todo_unknown_employee(repository: InMemoryEmployeeRepository) {
        let outcome = repository
            .push_todo(EmpId::new(42), task("c", "third"))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::unmatched());
    }

    #[rstest]
    #[tokio::test]
    async fn test_replace_tasks_overwrites(repository: InMemoryEmployeeRepository) {
        let outcome = repository
            .replace_tasks(EmpId::new(1007), vec![], vec![task("a", "first")])
            .await
            .unwrap();
        assert!(outcome.is_modified());

        let tasks = repository
            .find_tasks(EmpId::new(1007))
            .await
            .unwrap()
            .unwrap();
        assert!(tasks.todo.is_empty());
        assert_eq!(tasks.done, vec![task("a", "first")]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_replace_tasks_identical_is_not_modified(repository: InMemoryEmployeeRepository) {
        let outcome = repository
            .replace_tasks(
                EmpId::new(1007),
                vec![task("a", "first")],
                vec![task("b", "second")],
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::matched(false));
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_rejects_duplicate(repository: InMemoryEmployeeRepository) {
        let result = repository.insert(Employee::new(EmpId::new(1007))).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(id)) if id == EmpId::new(1007)));

        repository.insert(Employee::new(EmpId::new(1008))).await.unwrap();
        assert_eq!(repository.len().await, 2);
        assert!(!repository.is_empty().await);
    }
}
