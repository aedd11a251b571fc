//! HTTP access to the Nodebucket API.
//!
//! [`TaskService`] is the seam the view-model talks through;
//! [`NodebucketClient`] implements it over `reqwest`.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use super::error::ClientError;
use crate::api::{
    ApiError, CreateTaskRequest, CreateTaskResponse, EmployeeResponse, ReplaceTasksRequest,
    TaskDto, TasksResponse,
};
use crate::domain::{EmpId, TaskId};

/// Future returned by [`TaskService`] operations.
pub type ClientFuture<'a, T> = BoxFuture<'a, Result<T, ClientError>>;

/// Remote operations on one employee's tasks.
pub trait TaskService: Send + Sync {
    /// `GET /api/employees/{empId}`
    fn find_employee(&self, emp_id: EmpId) -> ClientFuture<'_, EmployeeResponse>;

    /// `GET /api/employees/{empId}/tasks`
    fn find_tasks(&self, emp_id: EmpId) -> ClientFuture<'_, TasksResponse>;

    /// `POST /api/employees/{empId}/tasks`
    fn create_task(&self, emp_id: EmpId, text: String) -> ClientFuture<'_, CreateTaskResponse>;

    /// `PUT /api/employees/{empId}/tasks`
    fn replace_tasks(
        &self,
        emp_id: EmpId,
        todo: Vec<TaskDto>,
        done: Vec<TaskDto>,
    ) -> ClientFuture<'_, ()>;

    /// `DELETE /api/employees/{empId}/tasks/{taskId}`
    fn delete_task(&self, emp_id: EmpId, task_id: TaskId) -> ClientFuture<'_, ()>;
}

// =============================================================================
// reqwest Implementation
// =============================================================================

/// `reqwest`-backed [`TaskService`].
#[derive(Debug, Clone)]
pub struct NodebucketClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NodebucketClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the address does not parse
    /// or cannot have path segments.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing connection pool.
    ///
    /// # Errors
    ///
    /// Same as [`NodebucketClient::new`].
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|error| ClientError::InvalidBaseUrl(format!("{base_url}: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Returns the server address.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/api/employees/{segments...}` with each segment escaped.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "employees"])
            .extend(segments);
        Ok(url)
    }
}

/// Converts a non-success response into [`ClientError::Api`].
///
/// The server's `message` is used when the body is a standard error
/// document, otherwise the status reason.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await?;
    let message = serde_json::from_slice::<ApiError>(&body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        },
        |error| error.message,
    );
    tracing::warn!(status = status.as_u16(), %message, "Request rejected");

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = ensure_success(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

impl TaskService for NodebucketClient {
    fn find_employee(&self, emp_id: EmpId) -> ClientFuture<'_, EmployeeResponse> {
        async move {
            let url = self.endpoint(&[emp_id.to_string().as_str()])?;
            tracing::debug!(%url, "Fetching employee");
            read_json(self.http.get(url).send().await?).await
        }
        .boxed()
    }

    fn find_tasks(&self, emp_id: EmpId) -> ClientFuture<'_, TasksResponse> {
        async move {
            let url = self.endpoint(&[emp_id.to_string().as_str(), "tasks"])?;
            tracing::debug!(%url, "Fetching tasks");
            read_json(self.http.get(url).send().await?).await
        }
        .boxed()
    }

    fn create_task(&self, emp_id: EmpId, text: String) -> ClientFuture<'_, CreateTaskResponse> {
        async move {
            let url = self.endpoint(&[emp_id.to_string().as_str(), "tasks"])?;
            let request = CreateTaskRequest { text };
            read_json(self.http.post(url).json(&request).send().await?).await
        }
        .boxed()
    }

    fn replace_tasks(
        &self,
        emp_id: EmpId,
        todo: Vec<TaskDto>,
        done: Vec<TaskDto>,
    ) -> ClientFuture<'_, ()> {
        async move {
            let url = self.endpoint(&[emp_id.to_string().as_str(), "tasks"])?;
            let request = ReplaceTasksRequest { todo, done };
            ensure_success(self.http.put(url).json(&request).send().await?).await?;
            Ok(())
        }
        .boxed()
    }

    fn delete_task(&self, emp_id: EmpId, task_id: TaskId) -> ClientFuture<'_, ()> {
        async move {
            let url = self.endpoint(&[emp_id.to_string().as_str(), "tasks", task_id.as_str()])?;
            ensure_success(self.http.delete(url).send().await?).await?;
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:3000", "http://localhost:3000/api/employees/1007/tasks")]
    #[case("http://localhost:3000/", "http://localhost:3000/api/employees/1007/tasks")]
    #[case(
        "http://example.com/nodebucket/",
        "http://example.com/nodebucket/api/employees/1007/tasks"
    )]
    fn test_endpoint_joins_segments(#[case] base: &str, #[case] expected: &str) {
        let client = NodebucketClient::new(base).unwrap();
        let url = client.endpoint(&["1007", "tasks"]).unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn test_endpoint_escapes_task_id() {
        let client = NodebucketClient::new("http://localhost:3000").unwrap();
        let url = client.endpoint(&["1007", "tasks", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/employees/1007/tasks/a%2Fb%20c"
        );
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.com")]
    fn test_invalid_base_url(#[case] base: &str) {
        assert!(matches!(
            NodebucketClient::new(base),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }
}
