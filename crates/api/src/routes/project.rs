//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> replace
/// PATCH  /{id}             -> patch
/// DELETE /{id}             -> delete (cascades to tasks)
/// GET    /{id}/tasks       -> list_tasks
/// POST   /{id}/recompute   -> recompute
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::replace)
                .patch(project::patch)
                .delete(project::delete),
        )
        .route("/{id}/tasks", get(project::list_tasks))
        .route("/{id}/recompute", post(project::recompute))
}
