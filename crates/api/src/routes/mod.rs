pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                    list, create
/// /projects/{id}               get, replace, patch, delete
/// /projects/{id}/tasks         tasks of one project
/// /projects/{id}/recompute     recompute completion (POST)
///
/// /tasks                       list, create
/// /tasks/{id}                  get, replace, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
