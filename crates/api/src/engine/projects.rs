//! Project writes.

use chrono::Utc;
use sqlx::PgPool;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_core::validation::{validate_project, validate_project_covers_tasks};
use taskflow_db::models::project::{CreateProject, Project, ProjectChange};
use taskflow_db::repositories::{ProjectRepo, TaskRepo};
use taskflow_db::UQ_PROJECTS_NAME;

use super::{lock_project, map_unique_violation};
use crate::error::{AppError, AppResult};

fn duplicate_name(name: &str) -> String {
    format!("A project named '{name}' already exists")
}

/// Validate and insert a new project.
pub async fn create_project(pool: &PgPool, input: &CreateProject) -> AppResult<Project> {
    let now = Utc::now();
    let draft = input.to_draft(now);
    validate_project(&draft, now).into_result()?;

    let mut conn = pool.acquire().await?;
    let project = ProjectRepo::create(&mut conn, &draft)
        .await
        .map_err(|e| map_unique_violation(e, UQ_PROJECTS_NAME, || duplicate_name(&draft.name)))?;

    tracing::info!(project_id = project.id, name = %project.name, "Project created");
    Ok(project)
}

/// Apply a full replace or partial update to a project.
///
/// Beyond the project's own rules, the resolved date range must still
/// contain every existing task of the project.
pub async fn update_project(pool: &PgPool, id: DbId, change: &ProjectChange) -> AppResult<Project> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let current = lock_project(&mut tx, id).await?;
    let draft = change.resolve(&current);

    let mut report = validate_project(&draft, now);
    let task_spans = TaskRepo::spans_by_project(&mut tx, id).await?;
    report.extend(validate_project_covers_tasks(&draft, &task_spans));
    report.into_result()?;

    let project = ProjectRepo::update(&mut tx, id, &draft)
        .await
        .map_err(|e| map_unique_violation(e, UQ_PROJECTS_NAME, || duplicate_name(&draft.name)))?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    tx.commit().await?;

    tracing::info!(project_id = project.id, name = %project.name, "Project updated");
    Ok(project)
}

/// Delete a project and, through the FK cascade, all of its tasks.
///
/// No completion propagation runs for the cascaded tasks.
pub async fn delete_project(pool: &PgPool, id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let project = lock_project(&mut tx, id).await?;
    ProjectRepo::delete(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(project_id = id, name = %project.name, "Project deleted");
    Ok(())
}
