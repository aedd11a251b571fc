//! # nodebucket
//!
//! Per-employee task tracking: a REST service that keeps a `todo` and a
//! `done` list on each employee document, and a client view-model that
//! drives it.
//!
//! ## Modules
//!
//! - [`domain`]: employees, tasks, and task identifiers
//! - [`infrastructure`]: employee storage (in-memory or `PostgreSQL`)
//! - [`api`]: axum handlers, payload schemas, and error responses
//! - [`client`]: HTTP client, sign-in, and the task board

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
