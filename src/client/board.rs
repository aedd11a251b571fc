//! The task board: local `todo` and `done` lists kept in step with the
//! server.
//!
//! Every action talks to the server first and only touches local state
//! once the request succeeded, so a failed action leaves the board as it
//! was.

use std::sync::Arc;

use super::error::ClientError;
use super::service::TaskService;
use crate::api::TaskDto;
use crate::domain::{EmpId, Task, TaskId, TaskList};

/// One employee's board.
pub struct TaskBoard {
    service: Arc<dyn TaskService>,
    emp_id: EmpId,
    todo: Vec<Task>,
    done: Vec<Task>,
}

impl std::fmt::Debug for TaskBoard {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskBoard")
            .field("emp_id", &self.emp_id)
            .field("todo", &self.todo)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

fn to_dtos(tasks: &[Task]) -> Vec<TaskDto> {
    tasks.iter().map(TaskDto::from).collect()
}

/// Moves `items[from]` to position `to`, clamping both indices.
fn move_within(items: &mut Vec<Task>, from: usize, to: usize) {
    let Some(last) = items.len().checked_sub(1) else {
        return;
    };
    let item = items.remove(from.min(last));
    items.insert(to.min(last), item);
}

impl TaskBoard {
    /// Fetches the employee's lists.
    ///
    /// # Errors
    ///
    /// Returns the service error if the fetch fails.
    pub async fn load(service: Arc<dyn TaskService>, emp_id: EmpId) -> Result<Self, ClientError> {
        let tasks = service.find_tasks(emp_id).await?;
        tracing::debug!(
            %emp_id,
            todo = tasks.todo.len(),
            done = tasks.done.len(),
            "Board loaded"
        );

        Ok(Self {
            service,
            emp_id,
            todo: tasks.todo.into_iter().map(Task::from).collect(),
            done: tasks.done.into_iter().map(Task::from).collect(),
        })
    }

    /// Returns the employee this board belongs to.
    #[must_use]
    pub const fn emp_id(&self) -> EmpId {
        self.emp_id
    }

    /// Returns the open tasks.
    #[must_use]
    pub fn todo(&self) -> &[Task] {
        &self.todo
    }

    /// Returns the finished tasks.
    #[must_use]
    pub fn done(&self) -> &[Task] {
        &self.done
    }

    /// Returns one of the two lists.
    #[must_use]
    pub fn list(&self, list: TaskList) -> &[Task] {
        match list {
            TaskList::Todo => &self.todo,
            TaskList::Done => &self.done,
        }
    }

    /// Replaces local state with the server's.
    ///
    /// # Errors
    ///
    /// Returns the service error; local state is kept.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = self.service.find_tasks(self.emp_id).await?;
        self.todo = tasks.todo.into_iter().map(Task::from).collect();
        self.done = tasks.done.into_iter().map(Task::from).collect();
        Ok(())
    }

    /// Creates a task on the server and appends it to `todo`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyTaskText`] for blank text, without a request
    /// - the service error if the request fails
    pub async fn create_task(&mut self, text: impl Into<String>) -> Result<TaskId, ClientError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ClientError::EmptyTaskText);
        }

        let response = self.service.create_task(self.emp_id, text.clone()).await?;
        let task_id = TaskId::new(response.id);
        self.todo.push(Task::new(task_id.clone(), text));

        tracing::info!(emp_id = %self.emp_id, %task_id, "Task added to board");
        Ok(task_id)
    }

    /// Moves a task to `index` in list `to` and saves both lists.
    ///
    /// `index` is clamped to the target list's length.
    ///
    /// # Errors
    ///
    /// - [`ClientError::TaskNotFound`] if the task is on neither list
    /// - the service error if saving fails; the board is unchanged
    pub async fn move_task(
        &mut self,
        task_id: &TaskId,
        to: TaskList,
        index: usize,
    ) -> Result<(), ClientError> {
        let mut todo = self.todo.clone();
        let mut done = self.done.clone();

        let item = [&mut todo, &mut done]
            .into_iter()
            .find_map(|items| {
                let position = items.iter().position(|task| task.has_id(task_id))?;
                Some(items.remove(position))
            })
            .ok_or_else(|| ClientError::TaskNotFound(task_id.clone()))?;

        let target = match to {
            TaskList::Todo => &mut todo,
            TaskList::Done => &mut done,
        };
        let index = index.min(target.len());
        target.insert(index, item);

        self.save(todo, done).await
    }

    /// Moves the item at `from` to `to` inside one list and saves both lists.
    ///
    /// Indices are clamped to the list; an empty list is left alone.
    ///
    /// # Errors
    ///
    /// Returns the service error if saving fails; the board is unchanged.
    pub async fn reorder(
        &mut self,
        list: TaskList,
        from: usize,
        to: usize,
    ) -> Result<(), ClientError> {
        let mut todo = self.todo.clone();
        let mut done = self.done.clone();

        match list {
            TaskList::Todo => move_within(&mut todo, from, to),
            TaskList::Done => move_within(&mut done, from, to),
        }

        self.save(todo, done).await
    }

    /// Deletes a task on the server and drops it from both lists.
    ///
    /// # Errors
    ///
    /// - [`ClientError::TaskNotFound`] if the task is on neither list
    /// - the service error if the request fails; the board is unchanged
    pub async fn delete_task(&mut self, task_id: &TaskId) -> Result<(), ClientError> {
        if !self.todo.iter().chain(&self.done).any(|task| task.has_id(task_id)) {
            return Err(ClientError::TaskNotFound(task_id.clone()));
        }

        self.service
            .delete_task(self.emp_id, task_id.clone())
            .await?;

        self.todo.retain(|task| !task.has_id(task_id));
        self.done.retain(|task| !task.has_id(task_id));

        tracing::info!(emp_id = %self.emp_id, %task_id, "Task removed from board");
        Ok(())
    }

    /// Sends both lists with a bulk replace and adopts them on success.
    async fn save(&mut self, todo: Vec<Task>, done: Vec<Task>) -> Result<(), ClientError> {
        if todo == self.todo && done == self.done {
            return Ok(());
        }

        if let Err(error) = self
            .service
            .replace_tasks(self.emp_id, to_dtos(&todo), to_dtos(&done))
            .await
        {
            tracing::warn!(emp_id = %self.emp_id, %error, "Board change rolled back");
            return Err(error);
        }

        self.todo = todo;
        self.done = done;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CreateTaskResponse, EmployeeResponse, TasksResponse};
    use crate::client::service::ClientFuture;
    use futures::FutureExt;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    /// Keeps one employee's lists in memory and records writes.
    #[derive(Default)]
    struct FakeService {
        todo: Mutex<Vec<TaskDto>>,
        done: Mutex<Vec<TaskDto>>,
        failing: AtomicBool,
        writes: AtomicU64,
        next_id: AtomicU64,
    }

    impl FakeService {
        fn seeded() -> Self {
            let dto = |id: &str, text: &str| TaskDto {
                id: id.to_string(),
                text: text.to_string(),
            };
            Self {
                todo: Mutex::new(vec![dto("a", "first"), dto("b", "second")]),
                done: Mutex::new(vec![dto("c", "third")]),
                ..Self::default()
            }
        }

        fn fail(&self) -> Result<(), ClientError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(ClientError::Api {
                    status: 500,
                    message: "An internal error occurred".to_string(),
                })
            } else {
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    impl TaskService for FakeService {
        fn find_employee(&self, _: EmpId) -> ClientFuture<'_, EmployeeResponse> {
            unimplemented!()
        }

        fn find_tasks(&self, emp_id: EmpId) -> ClientFuture<'_, TasksResponse> {
            async move {
                Ok(TasksResponse {
                    emp_id: emp_id.value(),
                    todo: self.todo.lock().unwrap().clone(),
                    done: self.done.lock().unwrap().clone(),
                })
            }
            .boxed()
        }

        fn create_task(&self, _: EmpId, text: String) -> ClientFuture<'_, CreateTaskResponse> {
            async move {
                self.fail()?;
                let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                self.todo.lock().unwrap().push(TaskDto {
                    id: id.clone(),
                    text,
                });
                Ok(CreateTaskResponse { id })
            }
            .boxed()
        }

        fn replace_tasks(
            &self,
            _: EmpId,
            todo: Vec<TaskDto>,
            done: Vec<TaskDto>,
        ) -> ClientFuture<'_, ()> {
            async move {
                self.fail()?;
                *self.todo.lock().unwrap() = todo;
                *self.done.lock().unwrap() = done;
                Ok(())
            }
            .boxed()
        }

        fn delete_task(&self, _: EmpId, task_id: TaskId) -> ClientFuture<'_, ()> {
            async move {
                self.fail()?;
                self.todo.lock().unwrap().retain(|task| task.id != task_id.as_str());
                self.done.lock().unwrap().retain(|task| task.id != task_id.as_str());
                Ok(())
            }
            .boxed()
        }
    }

    #[fixture]
    fn service() -> Arc<FakeService> {
        Arc::new(FakeService::seeded())
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.task_id.as_str()).collect()
    }

    async fn board(service: &Arc<FakeService>) -> TaskBoard {
        TaskBoard::load(service.clone(), EmpId::new(1007)).await.unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn test_load(service: Arc<FakeService>) {
        let board = board(&service).await;
        assert_eq!(board.emp_id(), EmpId::new(1007));
        assert_eq!(ids(board.todo()), vec!["a", "b"]);
        assert_eq!(ids(board.list(TaskList::Done)), vec!["c"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_appends_locally(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        let task_id = board.create_task("file expense report").await.unwrap();

        assert_eq!(task_id.as_str(), "new-0");
        assert_eq!(board.todo().last().unwrap(), &Task::new(task_id, "file expense report"));
        assert_eq!(service.todo.lock().unwrap().len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_rejects_blank_text(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        assert!(matches!(
            board.create_task("  ").await,
            Err(ClientError::EmptyTaskText)
        ));
        assert_eq!(service.writes.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case("a", TaskList::Done, 0, vec!["b"], vec!["a", "c"])]
    #[case("a", TaskList::Done, 99, vec!["b"], vec!["c", "a"])]
    #[case("c", TaskList::Todo, 1, vec!["a", "c", "b"], vec![])]
    #[case("b", TaskList::Todo, 0, vec!["b", "a"], vec!["c"])]
    #[tokio::test]
    async fn test_move_task(
        service: Arc<FakeService>,
        #[case] task_id: &str,
        #[case] to: TaskList,
        #[case] index: usize,
        #[case] expected_todo: Vec<&str>,
        #[case] expected_done: Vec<&str>,
    ) {
        let mut board = board(&service).await;
        board
            .move_task(&TaskId::new(task_id), to, index)
            .await
            .unwrap();

        assert_eq!(ids(board.todo()), expected_todo);
        assert_eq!(ids(board.done()), expected_done);

        let stored: Vec<String> = service
            .todo
            .lock()
            .unwrap()
            .iter()
            .map(|task| task.id.clone())
            .collect();
        assert_eq!(stored, expected_todo);
    }

    #[rstest]
    #[tokio::test]
    async fn test_move_task_rolls_back_on_failure(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        service.failing.store(true, Ordering::SeqCst);

        let result = board.move_task(&TaskId::new("a"), TaskList::Done, 0).await;

        assert_eq!(result.unwrap_err().status(), Some(500));
        assert_eq!(ids(board.todo()), vec!["a", "b"]);
        assert_eq!(ids(board.done()), vec!["c"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_move_unknown_task(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        let result = board.move_task(&TaskId::new("zzz"), TaskList::Done, 0).await;
        assert!(matches!(result, Err(ClientError::TaskNotFound(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_reorder(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        board.reorder(TaskList::Todo, 0, 1).await.unwrap();
        assert_eq!(ids(board.todo()), vec!["b", "a"]);
        assert_eq!(service.writes.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_reorder_without_change_skips_request(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        board.reorder(TaskList::Done, 0, 5).await.unwrap();
        assert_eq!(ids(board.done()), vec!["c"]);
        assert_eq!(service.writes.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_task(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        board.delete_task(&TaskId::new("c")).await.unwrap();
        assert!(board.done().is_empty());
        assert!(service.done.lock().unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_task_failure_keeps_board(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        service.failing.store(true, Ordering::SeqCst);

        assert!(board.delete_task(&TaskId::new("a")).await.is_err());
        assert_eq!(ids(board.todo()), vec!["a", "b"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_refresh_picks_up_remote_changes(service: Arc<FakeService>) {
        let mut board = board(&service).await;
        service.done.lock().unwrap().clear();
        board.refresh().await.unwrap();
        assert!(board.done().is_empty());
    }
}
