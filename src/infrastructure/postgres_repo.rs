use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;

use super::row_to_task;
use crate::domain::{
    repository::{RepositoryError, RepositoryResult, TaskRepository},
    task::{NewTask, Task, TaskId},
};

// `id_task` is cast so that tables declared with SERIAL decode the same as BIGSERIAL.
const SELECT_TASKS: &str = "SELECT id_task::BIGINT, title, status FROM task ORDER BY id_task";

#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Pings the server over a single connection before building the pool;
    /// the pool itself retries refused connections until its acquire timeout.
    pub async fn connect(options: PgConnectOptions) -> Result<Self, sqlx::Error> {
        let mut conn = PgConnection::connect_with(&options).await?;
        conn.ping().await?;
        conn.close().await?;
        let pool = PgPoolOptions::new().max_connections(10).connect_lazy_with(options);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self { Self { pool } }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS task (
                id_task BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                status TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn add(&self, task: NewTask) -> RepositoryResult<Task> {
        let id: i64 = sqlx::query_scalar("INSERT INTO task (title, status) VALUES ($1, $2) RETURNING id_task::BIGINT")
            .bind(task.title())
            .bind(task.status().as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(task.with_id(TaskId(id)))
    }

    async fn delete(&self, id: TaskId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM task WHERE id_task = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(RepositoryError::NotFound(id)); }
        Ok(())
    }

    async fn edit(&self, task: Task) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE task SET title = $1, status = $2 WHERE id_task = $3")
            .bind(&task.title)
            .bind(task.status.as_str())
            .bind(task.id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(RepositoryError::NotFound(task.id)); }
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Task>> {
        let rows = sqlx::query(SELECT_TASKS).fetch_all(&self.pool).await?;
        let tasks = rows.iter().map(row_to_task).collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}
