use async_trait::async_trait;
use thiserror::Error;

use super::task::{NewTask, Task, TaskId};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence contract over the `task` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Inserts a task and returns it with the id assigned by the store.
    async fn add(&self, task: NewTask) -> RepositoryResult<Task>;

    /// Removes the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when no row matched.
    async fn delete(&self, id: TaskId) -> RepositoryResult<()>;

    /// Overwrites title and status of the task with `task.id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when no row matched.
    async fn edit(&self, task: Task) -> RepositoryResult<()>;

    /// All tasks in insertion order.
    async fn list(&self) -> RepositoryResult<Vec<Task>>;
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(err))
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self { Self::store(err) }
}
