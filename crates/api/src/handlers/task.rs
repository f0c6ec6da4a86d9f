//! Handlers for the `/tasks` resource.
//!
//! Writes respond with the task and the recomputed state of every project
//! the write touched.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::task::{CreateTask, Task, TaskChange, UpdateTask};
use taskflow_db::repositories::TaskRepo;

use crate::engine::tasks::{self, TaskWrite};
use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, TaskWriteResponse};
use crate::state::AppState;

impl<T: serde::Serialize> From<TaskWrite<T>> for TaskWriteResponse<T> {
    fn from(write: TaskWrite<T>) -> Self {
        Self {
            data: write.task,
            projects: write.projects,
        }
    }
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<TaskWriteResponse<Task>>)> {
    let write = tasks::create_task(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(write.into())))
}

/// GET /api/v1/tasks
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = TaskRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    tracing::debug!(task_id = id, "Fetched task");
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<Json<TaskWriteResponse<Task>>> {
    let write = tasks::update_task(&state.pool, id, &TaskChange::Replace(input)).await?;
    Ok(Json(write.into()))
}

/// PATCH /api/v1/tasks/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<TaskWriteResponse<Task>>> {
    let write = tasks::update_task(&state.pool, id, &TaskChange::Patch(input)).await?;
    Ok(Json(write.into()))
}

/// DELETE /api/v1/tasks/{id}
///
/// Responds `200` with `{"data": null, "projects": [...]}` so the client
/// sees the owning project's recomputed state.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskWriteResponse<()>>> {
    let write = tasks::delete_task(&state.pool, id).await?;
    Ok(Json(write.into()))
}
