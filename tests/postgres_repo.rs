//! Repository contract against a live PostgreSQL server.
//!
//! Run with `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

use sqlx::postgres::PgPoolOptions;
use task_api::{
    domain::{
        repository::{RepositoryError, TaskRepository},
        task::{NewTask, Task, TaskId, TaskStatus},
    },
    infrastructure::postgres_repo::PgTaskRepository,
};

async fn repo() -> PgTaskRepository {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new().max_connections(1).connect(&url).await.unwrap();
    let repo = PgTaskRepository::from_pool(pool.clone());
    repo.ensure_schema().await.unwrap();
    sqlx::query("TRUNCATE task RESTART IDENTITY").execute(&pool).await.unwrap();
    repo
}

#[tokio::test]
#[ignore = "requires a PostgreSQL server (set TEST_DATABASE_URL)"]
async fn postgres_task_lifecycle() {
    let repo = repo().await;
    assert!(repo.list().await.unwrap().is_empty());

    let created = repo.add(NewTask::new("Test", TaskStatus::Todo).unwrap()).await.unwrap();
    assert_eq!(repo.list().await.unwrap(), vec![created.clone()]);

    let edited = Task { id: created.id, title: "Tested".into(), status: TaskStatus::Done };
    repo.edit(edited.clone()).await.unwrap();
    assert_eq!(repo.list().await.unwrap(), vec![edited]);

    let missing = TaskId(created.id.0 + 1);
    assert!(matches!(
        repo.edit(Task { id: missing, title: "x".into(), status: TaskStatus::Todo }).await,
        Err(RepositoryError::NotFound(id)) if id == missing
    ));

    repo.delete(created.id).await.unwrap();
    assert!(matches!(repo.delete(created.id).await, Err(RepositoryError::NotFound(_))));
    assert!(repo.list().await.unwrap().is_empty());
}
