//! `PostgreSQL` repository implementation.
//!
//! Each employee is stored as one JSONB document, so every update below is a
//! single-row statement and inherits row-level atomicity.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS employees (
//!     emp_id BIGINT PRIMARY KEY,
//!     data JSONB NOT NULL
//! );
//! ```

use futures::FutureExt;
use sqlx::PgPool;

use crate::domain::{EmpId, Employee, EmployeeTasks, Task};
use crate::infrastructure::{EmployeeRepository, RepositoryError, RepositoryFuture, UpdateOutcome};

const CREATE_EMPLOYEES_TABLE: &str = "CREATE TABLE IF NOT EXISTS employees (
    emp_id BIGINT PRIMARY KEY,
    data JSONB NOT NULL
)";

fn database_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

fn serialization_error(error: serde_json::Error) -> RepositoryError {
    RepositoryError::SerializationError(error.to_string())
}

// =============================================================================
// PostgreSQL Employee Repository
// =============================================================================

/// `PostgreSQL` implementation of `EmployeeRepository`.
///
/// # Example
///
/// ```ignore
/// use nodebucket::infrastructure::PostgresEmployeeRepository;
///
/// let pool = PgPool::connect("postgres://localhost/nodebucket").await?;
/// let repository = PostgresEmployeeRepository::new(pool);
/// repository.ensure_schema().await?;
/// let found = repository.find_by_emp_id(EmpId::new(1007)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    /// Creates a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `employees` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DatabaseError` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_EMPLOYEES_TABLE)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }
}

impl EmployeeRepository for PostgresEmployeeRepository {
    fn find_by_emp_id(&self, emp_id: EmpId) -> RepositoryFuture<'_, Option<Employee>> {
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("SELECT data FROM employees WHERE emp_id = $1")
                    .bind(emp_id.value())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(database_error)?;

            row.map(|(data,)| serde_json::from_value(data))
                .transpose()
                .map_err(serialization_error)
        }
        .boxed()
    }

    fn find_tasks(&self, emp_id: EmpId) -> RepositoryFuture<'_, Option<EmployeeTasks>> {
        async move {
            let row: Option<(serde_json::Value, serde_json::Value)> = sqlx::query_as(
                "SELECT COALESCE(NULLIF(data->'todo', 'null'::jsonb), '[]'::jsonb),
                        COALESCE(NULLIF(data->'done', 'null'::jsonb), '[]'::jsonb)
                 FROM employees WHERE emp_id = $1",
            )
            .bind(emp_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

            let Some((todo, done)) = row else {
                return Ok(None);
            };

            Ok(Some(EmployeeTasks {
                emp_id,
                todo: serde_json::from_value(todo).map_err(serialization_error)?,
                done: serde_json::from_value(done).map_err(serialization_error)?,
            }))
        }
        .boxed()
    }

    fn push_todo(&self, emp_id: EmpId, task: Task) -> RepositoryFuture<'_, UpdateOutcome> {
        async move {
            let task_data = serde_json::to_value(&task).map_err(serialization_error)?;

            let result = sqlx::query(
                "UPDATE employees
                 SET data = jsonb_set(
                     data,
                     '{todo}',
                     COALESCE(NULLIF(data->'todo', 'null'::jsonb), '[]'::jsonb)
                         || jsonb_build_array($2::jsonb)
                 )
                 WHERE emp_id = $1",
            )
            .bind(emp_id.value())
            .bind(task_data)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

            Ok(UpdateOutcome {
                matched_count: result.rows_affected(),
                modified_count: result.rows_affected(),
            })
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
            let todo_data = serde_json::to_value(&todo).map_err(serialization_error)?;
            let done_data = serde_json::to_value(&done).map_err(serialization_error)?;

            // Both CTEs share one snapshot, so `previous` holds the pre-update document.
            let row: Option<(bool,)> = sqlx::query_as(
                "WITH previous AS (
                     SELECT data FROM employees WHERE emp_id = $1
                 ), updated AS (
                     UPDATE employees
                     SET data = employees.data || jsonb_build_object('todo', $2::jsonb, 'done', $3::jsonb)
                     WHERE emp_id = $1
                     RETURNING emp_id
                 )
                 SELECT (previous.data->'todo' IS DISTINCT FROM $2::jsonb
                         OR previous.data->'done' IS DISTINCT FROM $3::jsonb)
                 FROM previous JOIN updated ON TRUE",
            )
            .bind(emp_id.value())
            .bind(todo_data)
            .bind(done_data)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

            Ok(row.map_or_else(UpdateOutcome::unmatched, |(modified,)| {
                UpdateOutcome::matched(modified)
            }))
        }
        .boxed()
    }

    fn insert(&self, employee: Employee) -> RepositoryFuture<'_, ()> {
        async move {
            let data = serde_json::to_value(&employee).map_err(serialization_error)?;

            let result = sqlx::query(
                "INSERT INTO employees (emp_id, data) VALUES ($1, $2)
                 ON CONFLICT (emp_id) DO NOTHING",
            )
            .bind(employee.emp_id.value())
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::Duplicate(employee.emp_id));
            }
            Ok(())
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
