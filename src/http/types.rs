use axum::response::{IntoResponse, Response};
use ::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    repository::RepositoryError,
    task::{NewTask, Task, TaskId, TaskStatus, ValidationError},
};

/// Plain-text body of every successful mutation.
pub const SUCCESS: &str = "success";

/// Request body of add and edit. Unknown fields, including any `id`, are ignored.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub status: Option<StatusField>,
}

/// Body of `PUT /edit`, which carries the id next to the task fields.
#[derive(Debug, Deserialize)]
pub struct EditPayload {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub task: TaskPayload,
}

/// Status as sent by clients: the canonical name or the legacy integer code.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StatusField {
    Name(String),
    Code(i64),
}

/// Decodes a JSON request body; any failure is a client error.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

impl TaskPayload {
    pub fn into_new_task(self) -> Result<NewTask, ValidationError> {
        let status = match self.status {
            Some(StatusField::Name(name)) => name.parse::<TaskStatus>()?,
            Some(StatusField::Code(code)) => TaskStatus::from_code(code)?,
            None => return Err(ValidationError::MissingStatus),
        };
        NewTask::new(self.title.unwrap_or_default(), status)
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub message: &'static str,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid id")]
    InvalidId,

    #[error("can not decode body")]
    Decode(#[source] serde_json::Error),

    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("task not found")]
    NotFound(TaskId),

    #[error("internal server error")]
    Internal(#[source] RepositoryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ApiError::NotFound(id),
            err => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(err) => tracing::error!(error = %err, "task store failure"),
            ApiError::Decode(err) => tracing::debug!(error = %err, "undecodable request body"),
            ApiError::Validation(err) => tracing::debug!(error = %err, "invalid task"),
            ApiError::NotFound(id) => tracing::debug!(%id, "task not found"),
            ApiError::InvalidId => tracing::debug!("invalid task id"),
        }
        (self.status(), self.to_string()).into_response()
    }
}
