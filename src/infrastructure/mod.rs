pub mod postgres_repo;
pub mod sqlite_repo;

use sqlx::Row;

use crate::domain::task::{Task, TaskId, TaskStatus};

/// Maps a `(id_task, title, status)` row onto a [`Task`].
fn row_to_task<R>(row: &R) -> Result<Task, sqlx::Error>
where
    R: Row,
    usize: sqlx::ColumnIndex<R>,
    i64: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    String: for<'r> sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    let id: i64 = row.try_get(0)?;
    let title: String = row.try_get(1)?;
    let status: String = row.try_get(2)?;
    let status = status.parse::<TaskStatus>().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: Box::new(e),
    })?;
    Ok(Task { id: TaskId(id), title, status })
}
