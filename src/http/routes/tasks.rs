use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::{
    application::task_usecase::TaskUsecase,
    domain::task::TaskId,
    http::types::{decode, ApiError, EditPayload, ListResponse, TaskPayload, SUCCESS},
};

pub struct AppState<U: TaskUsecase> { pub usecase: Arc<U> }

impl<U: TaskUsecase> AppState<U> {
    pub fn new(usecase: U) -> Self { Self { usecase: Arc::new(usecase) } }
}

impl<U: TaskUsecase> Clone for AppState<U> {
    fn clone(&self) -> Self { Self { usecase: Arc::clone(&self.usecase) } }
}

pub fn router<U: TaskUsecase>(state: AppState<U>) -> Router {
    Router::new()
        .route("/add", post(add_task::<U>))
        .route("/list", get(list_tasks::<U>))
        .route("/edit", put(edit_task_from_body::<U>))
        .route("/task/:id", put(edit_task::<U>).delete(delete_task::<U>))
        .with_state(state)
}

async fn add_task<U: TaskUsecase>(State(state): State<AppState<U>>, body: Bytes) -> Result<&'static str, ApiError> {
    let task = decode::<TaskPayload>(&body)?.into_new_task()?;
    let stored = state.usecase.add(task).await?;
    tracing::info!(id = %stored.id, "task added");
    Ok(SUCCESS)
}

async fn list_tasks<U: TaskUsecase>(State(state): State<AppState<U>>) -> Result<Json<ListResponse>, ApiError> {
    let tasks = state.usecase.list().await?;
    Ok(Json(ListResponse { message: SUCCESS, tasks }))
}

async fn edit_task<U: TaskUsecase>(
    State(state): State<AppState<U>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let id = parse_id(&id)?;
    let payload: TaskPayload = decode(&body)?;
    apply_edit(state.usecase.as_ref(), id, payload).await
}

async fn edit_task_from_body<U: TaskUsecase>(State(state): State<AppState<U>>, body: Bytes) -> Result<&'static str, ApiError> {
    let payload: EditPayload = decode(&body)?;
    let id = payload.id.map(TaskId).ok_or(ApiError::InvalidId)?;
    apply_edit(state.usecase.as_ref(), id, payload.task).await
}

async fn apply_edit<U: TaskUsecase>(usecase: &U, id: TaskId, payload: TaskPayload) -> Result<&'static str, ApiError> {
    let task = payload.into_new_task()?.with_id(id);
    usecase.edit(task).await?;
    tracing::info!(%id, "task edited");
    Ok(SUCCESS)
}

async fn delete_task<U: TaskUsecase>(State(state): State<AppState<U>>, Path(id): Path<String>) -> Result<&'static str, ApiError> {
    let id = parse_id(&id)?;
    state.usecase.delete(id).await?;
    tracing::info!(%id, "task deleted");
    Ok(SUCCESS)
}

fn parse_id(s: &str) -> Result<TaskId, ApiError> { s.parse::<i64>().map(TaskId).map_err(|_| ApiError::InvalidId) }
