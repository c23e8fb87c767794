use super::AppState;
use crate::models::{MessageResponse, StatusUpdate, SubTask, Task};
use crate::store::StoreError;
use crate::TASKS_API;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to read tasks data")]
    ReadFailed(#[source] StoreError),

    /// Carries the message for the operation whose write failed.
    #[error("{0}")]
    WriteFailed(&'static str, #[source] StoreError),
}

impl ApiError {
    /// Classifies a store failure; `write_message` is reported when the
    /// collection was loaded but could not be saved.
    fn from_store(err: StoreError, write_message: &'static str) -> Self {
        if err.is_read() {
            ApiError::ReadFailed(err)
        } else {
            ApiError::WriteFailed(write_message, err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::ReadFailed(source) | ApiError::WriteFailed(_, source) => {
                error!("{self}: {source}");
            }
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            format!("/{TASKS_API}").as_str(),
            get(list_tasks).post(create_task),
        )
        .route(format!("/{TASKS_API}/:task_id").as_str(), delete(delete_task))
        .route(
            format!("/{TASKS_API}/:task_id/status").as_str(),
            put(update_task_status),
        )
        .route(
            format!("/{TASKS_API}/:task_id/subtasks").as_str(),
            post(add_subtask),
        )
        .route(
            format!("/{TASKS_API}/:task_id/subtasks/:subtask_id").as_str(),
            delete(delete_subtask),
        )
        .route(
            format!("/{TASKS_API}/:task_id/subtasks/:subtask_id/status").as_str(),
            put(update_subtask_status),
        )
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.list().map_err(ApiError::ReadFailed)?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<Task>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state
        .store
        .create(payload)
        .map_err(|e| ApiError::from_store(e, "Failed to save task"))?;
    info!("Created task {}", task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn add_subtask(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<SubTask>,
) -> Result<(StatusCode, Json<SubTask>), ApiError> {
    let subtask = state
        .store
        .add_subtask(&task_id, payload)
        .map_err(|e| ApiError::from_store(e, "Failed to save subtask"))?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .update_task_status(&task_id, payload.status)
        .map_err(|e| ApiError::from_store(e, "Failed to update task status"))?;
    Ok(Json(MessageResponse {
        message: "Task status updated".to_string(),
    }))
}

pub async fn update_subtask_status(
    State(state): State<AppState>,
    Path((task_id, subtask_id)): Path<(String, String)>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .update_subtask_status(&task_id, &subtask_id, payload.status)
        .map_err(|e| ApiError::from_store(e, "Failed to update subtask status"))?;
    Ok(Json(MessageResponse {
        message: "Subtask status updated".to_string(),
    }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_task(&task_id)
        .map_err(|e| ApiError::from_store(e, "Failed to delete task"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_subtask(
    State(state): State<AppState>,
    Path((task_id, subtask_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_subtask(&task_id, &subtask_id)
        .map_err(|e| ApiError::from_store(e, "Failed to delete subtask"))?;
    Ok(StatusCode::NO_CONTENT)
}
