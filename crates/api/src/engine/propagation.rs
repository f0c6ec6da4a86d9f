//! Completion propagation: keeps `projects.finished` in step with the
//! project's tasks.
//!
//! [`propagate_completion`] is the post-write hook the task engine calls
//! inside its transaction, after the task row has been written and while
//! the project row is still locked. [`recompute_project`] runs the same
//! recompute on demand in its own transaction.

use sqlx::{PgConnection, PgPool};
use taskflow_core::completion::project_finished;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::project::Project;
use taskflow_db::repositories::{ProjectRepo, TaskRepo};

use super::lock_project;
use crate::error::{AppError, AppResult};

/// Recompute and persist `finished` for a project the caller has already
/// locked in this transaction.
///
/// The project is written even when the flag does not change, so
/// `updated_at` always reflects the latest task write. Only storage errors
/// can occur here; no business rule is re-checked.
pub async fn propagate_completion(conn: &mut PgConnection, project_id: DbId) -> AppResult<Project> {
    let progress = TaskRepo::progress_by_project(conn, project_id).await?;
    let open_tasks = progress.iter().filter(|p| p.unfinished).count();
    let finished = project_finished(progress);

    let project = ProjectRepo::set_finished(conn, project_id, finished)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    tracing::debug!(project_id, finished, open_tasks, "Recomputed project completion");
    Ok(project)
}

/// Lock a project and recompute its `finished` flag in a fresh transaction.
pub async fn recompute_project(pool: &PgPool, project_id: DbId) -> AppResult<Project> {
    let mut tx = pool.begin().await?;
    let before = lock_project(&mut tx, project_id).await?;
    let project = propagate_completion(&mut tx, project_id).await?;
    tx.commit().await?;

    if before.finished != project.finished {
        tracing::warn!(
            project_id,
            finished = project.finished,
            "Project completion was stale and has been corrected",
        );
    }
    Ok(project)
}
