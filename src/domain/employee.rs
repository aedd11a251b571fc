//! Employee domain model.
//!
//! An employee document is keyed by a numeric, externally supplied
//! `empId` and embeds two ordered task arrays. Seeded documents may carry
//! extra fields (email, role, ...); they are kept verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::task::{Task, TaskId};

// =============================================================================
// Employee Identifier
// =============================================================================

/// Numeric employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmpId(i64);

/// Error returned when a path segment is not a valid employee identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Employee ID must be a number, got '{input}'")]
pub struct EmpIdParseError {
    /// The rejected input.
    pub input: String,
}

impl EmpId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Parses an identifier from untrusted input.
    ///
    /// Surrounding whitespace is ignored; everything else must be an
    /// optionally signed base-10 integer that fits in `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`EmpIdParseError`] for empty, non-numeric, or out-of-range
    /// input.
    pub fn parse(input: &str) -> Result<Self, EmpIdParseError> {
        input
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| EmpIdParseError {
                input: input.to_string(),
            })
    }
}

impl std::fmt::Display for EmpId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl std::str::FromStr for EmpId {
    type Err = EmpIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

// =============================================================================
// Employee Document
// =============================================================================

/// Reads an absent or `null` task array as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Task>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A persisted employee document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Lookup key.
    pub emp_id: EmpId,
    /// Given name, if seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name, if seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Open tasks, in display order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub todo: Vec<Task>,
    /// Finished tasks, in display order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub done: Vec<Task>,
    /// Any other seeded fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Employee {
    /// Creates an employee with empty task lists.
    #[must_use]
    pub fn new(emp_id: EmpId) -> Self {
        Self {
            emp_id,
            first_name: None,
            last_name: None,
            todo: Vec::new(),
            done: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    /// Replaces the `todo` list.
    #[must_use]
    pub fn with_todo(mut self, todo: Vec<Task>) -> Self {
        self.todo = todo;
        self
    }

    /// Replaces the `done` list.
    #[must_use]
    pub fn with_done(mut self, done: Vec<Task>) -> Self {
        self.done = done;
        self
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

    /// Returns the `{ empId, todo, done }` projection.
    #[must_use]
    pub fn tasks(&self) -> EmployeeTasks {
        EmployeeTasks {
            emp_id: self.emp_id,
            todo: self.todo.clone(),
            done: self.done.clone(),
        }
    }
}

// =============================================================================
// Task Projection
// =============================================================================

/// The task-only projection of an employee document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTasks {
    pub emp_id: EmpId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub todo: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub done: Vec<Task>,
}

impl EmployeeTasks {
    /// Returns both lists with every item matching `task_id` removed.
    ///
    /// This is a pure function; ids absent from both lists leave them unchanged.
    #[must_use]
    pub fn without_task(&self, task_id: &TaskId) -> (Vec<Task>, Vec<Task>) {
        let keep = |task: &&Task| !task.has_id(task_id);
        (
            self.todo.iter().filter(keep).cloned().collect(),
            self.done.iter().filter(keep).cloned().collect(),
        )
    }

    /// Returns true if either list contains `task_id`.
    #[must_use]
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.todo
            .iter()
            .chain(self.done.iter())
            .any(|task| task.has_id(task_id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn task(id: &str) -> Task {
        Task::new(TaskId::new(id), format!("text {id}"))
    }

    #[rstest]
    #[case("1007", 1007)]
    #[case(" 1008 ", 1008)]
    #[case("-3", -3)]
    #[case("+12", 12)]
    fn test_emp_id_parse_valid(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(EmpId::parse(input).unwrap().value(), expected);
    }

    #[rstest]
    #[case("foo")]
    #[case("")]
    #[case("10o7")]
    #[case("1007abc")]
    #[case("1.5")]
    #[case("99999999999999999999")]
    fn test_emp_id_parse_invalid(#[case] input: &str) {
        let error = EmpId::parse(input).unwrap_err();
        assert_eq!(error.input, input);
    }

    #[rstest]
    fn test_employee_missing_arrays_default_to_empty() {
        let employee: Employee =
            serde_json::from_str(r#"{"empId": 1007, "firstName": "Ada"}"#).unwrap();
        assert_eq!(employee.emp_id, EmpId::new(1007));
        assert!(employee.todo.is_empty());
        assert!(employee.done.is_empty());
    }

    #[rstest]
    #[case(r#"{"empId": 5, "todo": null}"#)]
    #[case(r#"{"empId": 5, "done": null}"#)]
    #[case(r#"{"empId": 5, "todo": null, "done": null, "email": "x@example.com"}"#)]
    fn test_employee_null_arrays_read_as_empty(#[case] input: &str) {
        let employee: Employee = serde_json::from_str(input).unwrap();
        assert!(employee.todo.is_empty());
        assert!(employee.done.is_empty());
        assert!(!employee.extra.contains_key("todo"));
    }

    #[rstest]
    fn test_task_projection_null_arrays_read_as_empty() {
        let tasks: EmployeeTasks =
            serde_json::from_str(r#"{"empId": 5, "todo": null, "done": null}"#).unwrap();
        assert_eq!(tasks.emp_id, EmpId::new(5));
        assert!(tasks.todo.is_empty());
        assert!(tasks.done.is_empty());
    }

    #[rstest]
    fn test_employee_extra_fields_round_trip() {
        let input = serde_json::json!({
            "empId": 1007,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "todo": [],
            "done": []
        });
        let employee: Employee = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(
            employee.extra.get("email"),
            Some(&serde_json::json!("ada@example.com"))
        );
        assert_eq!(serde_json::to_value(&employee).unwrap(), input);
    }

    #[rstest]
    fn test_full_name() {
        let employee = Employee::new(EmpId::new(1)).with_name("Ada", "Lovelace");
        assert_eq!(employee.full_name(), "Ada Lovelace");

        let mut employee = Employee::new(EmpId::new(2));
        employee.first_name = Some("Grace".to_string());
        assert_eq!(employee.full_name(), "Grace");
    }

    #[rstest]
    fn test_without_task_removes_from_both_lists() {
        let tasks = EmployeeTasks {
            emp_id: EmpId::new(1),
            todo: vec![task("a"), task("b")],
            done: vec![task("b"), task("c")],
        };

        let (todo, done) = tasks.without_task(&TaskId::new("b"));
        assert_eq!(todo, vec![task("a")]);
        assert_eq!(done, vec![task("c")]);
    }

    #[rstest]
    fn test_without_task_unknown_id_is_noop() {
        let tasks = EmployeeTasks {
            emp_id: EmpId::new(1),
            todo: vec![task("a")],
            done: vec![task("c")],
        };

        let (todo, done) = tasks.without_task(&TaskId::new("zzz"));
        assert_eq!(todo, tasks.todo);
        assert_eq!(done, tasks.done);
        assert!(!tasks.contains(&TaskId::new("zzz")));
        assert!(tasks.contains(&TaskId::new("c")));
    }
}
