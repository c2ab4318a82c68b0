use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::row_to_task;
use crate::domain::{
    repository::{RepositoryError, RepositoryResult, TaskRepository},
    task::{NewTask, Task, TaskId},
};

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Opens `database_url`, creating the database file and its parent
    /// directories when they do not exist.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let in_memory = database_url.contains(":memory:");
        if let Some(parent) = database_path(database_url).and_then(Path::parent).filter(|p| !in_memory && !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let pool = if in_memory {
            // every connection to :memory: is a distinct database
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().max_connections(5).connect_with(options).await?
        };
        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS task (
                id_task INTEGER PRIMARY KEY AUTOINCREMENT,
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
impl TaskRepository for SqliteTaskRepository {
    async fn add(&self, task: NewTask) -> RepositoryResult<Task> {
        let id: i64 = sqlx::query_scalar("INSERT INTO task (title, status) VALUES (?1, ?2) RETURNING id_task")
            .bind(task.title())
            .bind(task.status().as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(task.with_id(TaskId(id)))
    }

    async fn delete(&self, id: TaskId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM task WHERE id_task = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(RepositoryError::NotFound(id)); }
        Ok(())
    }

    async fn edit(&self, task: Task) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE task SET title = ?1, status = ?2 WHERE id_task = ?3")
            .bind(&task.title)
            .bind(task.status.as_str())
            .bind(task.id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 { return Err(RepositoryError::NotFound(task.id)); }
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Task>> {
        let rows = sqlx::query("SELECT id_task, title, status FROM task ORDER BY id_task")
            .fetch_all(&self.pool)
            .await?;
        let tasks = rows.iter().map(row_to_task).collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

/// Filesystem path of a `sqlite:` URL, without its query string.
fn database_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://").or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty()).then(|| Path::new(path))
}
