//! Client view-model for the Nodebucket API.
//!
//! - [`SignIn`] checks an employee id and looks the employee up
//! - [`TaskBoard`] keeps the `todo` and `done` lists in step with the server
//! - [`NodebucketClient`] is the HTTP transport behind [`TaskService`]

pub mod board;
pub mod error;
pub mod service;
pub mod session;

pub use board::TaskBoard;
pub use error::ClientError;
pub use service::{ClientFuture, NodebucketClient, TaskService};
pub use session::{INVALID_EMPLOYEE_ID_MESSAGE, SessionUser, SignIn};
