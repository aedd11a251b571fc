//! Sign-in.
//!
//! There are no credentials: an employee signs in by entering an
//! identifier that exists in the store.

use super::error::ClientError;
use super::service::TaskService;
use crate::domain::EmpId;

/// Shown when the sign-in input is not a usable identifier.
pub const INVALID_EMPLOYEE_ID_MESSAGE: &str =
    "The employee ID you entered is invalid, please try again.";

/// The signed-in employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Employee identifier.
    pub emp_id: EmpId,
    /// `"{first} {last}"`.
    pub full_name: String,
}

/// Sign-in form logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignIn;

impl SignIn {
    /// Checks the form input before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEmployeeId`] unless the trimmed input is
    /// a non-empty string of ASCII digits that fits an identifier.
    pub fn validate(input: &str) -> Result<EmpId, ClientError> {
        let trimmed = input.trim();
        let invalid = || ClientError::InvalidEmployeeId {
            input: input.to_string(),
        };

        if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        EmpId::parse(trimmed).map_err(|_| invalid())
    }

    /// Validates the input and looks the employee up.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidEmployeeId`] if the input is rejected locally
    /// - [`ClientError::Api`] carrying the server message, e.g. for an unknown id
    /// - transport or decode failures
    pub async fn sign_in(
        service: &dyn TaskService,
        input: &str,
    ) -> Result<SessionUser, ClientError> {
        let emp_id = Self::validate(input)?;
        let employee = service.find_employee(emp_id).await?;

        tracing::info!(%emp_id, "Employee signed in");
        Ok(SessionUser {
            emp_id: employee.emp_id(),
            full_name: employee.full_name(),
        })
    }
}
