//! Domain module for employee task tracking.
//!
//! This module contains the employee document, its embedded task items,
//! and the task identifier generators.

pub mod employee;
pub mod task;

pub use employee::{EmpId, EmpIdParseError, Employee, EmployeeTasks};
pub use task::{
    SequentialTaskIdGenerator, Task, TaskId, TaskIdGenerator, TaskList, UuidTaskIdGenerator,
};
