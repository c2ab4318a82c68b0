use crate::domain::repository::{RepositoryResult, TaskRepository};
use crate::domain::task::{NewTask, Task, TaskId};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskUsecase: Send + Sync + 'static {
    async fn add(&self, task: NewTask) -> RepositoryResult<Task>;
    async fn delete(&self, id: TaskId) -> RepositoryResult<()>;
    async fn edit(&self, task: Task) -> RepositoryResult<()>;
    async fn list(&self) -> RepositoryResult<Vec<Task>>;
}

/// Forwards every call to the repository unchanged.
#[derive(Clone)]
pub struct TaskUsecaseImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskUsecaseImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TaskRepository> TaskUsecase for TaskUsecaseImpl<R> {
    async fn add(&self, task: NewTask) -> RepositoryResult<Task> { self.repo.add(task).await }
    async fn delete(&self, id: TaskId) -> RepositoryResult<()> { self.repo.delete(id).await }
    async fn edit(&self, task: Task) -> RepositoryResult<()> { self.repo.edit(task).await }
    async fn list(&self) -> RepositoryResult<Vec<Task>> { self.repo.list().await }
}
