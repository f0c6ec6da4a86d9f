//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::project::{CreateProject, Project, ProjectChange, UpdateProject};
use taskflow_db::models::task::Task;
use taskflow_db::repositories::{ProjectRepo, TaskRepo};

use crate::engine::{projects, propagation};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = projects::create_project(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::debug!(project_id = id, "Fetched project");
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Full replace: omitted optional fields are cleared.
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project =
        projects::update_project(&state.pool, id, &ProjectChange::Replace(input)).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/v1/projects/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = projects::update_project(&state.pool, id, &ProjectChange::Patch(input)).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project and all of its tasks.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    projects::delete_project(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    if ProjectRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    let tasks = TaskRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/projects/{id}/recompute
///
/// Recomputes `finished` from the project's tasks and persists it.
pub async fn recompute(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = propagation::recompute_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: project }))
}
