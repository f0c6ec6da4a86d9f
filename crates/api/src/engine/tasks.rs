//! Task writes. Each one recomputes the completion of every project it
//! touches before the transaction commits.

use chrono::Utc;
use sqlx::PgPool;
use taskflow_core::completion::projects_to_recompute;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_core::validation::{validate_task, TaskDraft};
use taskflow_db::models::project::Project;
use taskflow_db::models::task::{CreateTask, Task, TaskChange};
use taskflow_db::repositories::TaskRepo;
use taskflow_db::UQ_TASKS_PROJECT_ID_NAME;

use super::propagation::propagate_completion;
use super::{lock_project, map_unique_violation};
use crate::error::{AppError, AppResult};

/// Result of a task write: the task (if it still exists) and the
/// recomputed state of every affected project, ascending by id.
#[derive(Debug)]
pub struct TaskWrite<T> {
    pub task: T,
    pub projects: Vec<Project>,
}

fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

fn duplicate_name(draft: &TaskDraft) -> String {
    format!(
        "Project {} already has a task named '{}'",
        draft.project_id, draft.name
    )
}

/// Validate and insert a new task, then recompute its project.
pub async fn create_task(pool: &PgPool, input: &CreateTask) -> AppResult<TaskWrite<Task>> {
    let now = Utc::now();
    let draft = input.to_draft(now);

    let mut tx = pool.begin().await?;
    let project = lock_project(&mut tx, draft.project_id).await?;
    validate_task(&draft, &project.span(), now).into_result()?;

    let task = TaskRepo::create(&mut tx, &draft)
        .await
        .map_err(|e| map_unique_violation(e, UQ_TASKS_PROJECT_ID_NAME, || duplicate_name(&draft)))?;
    let project = propagate_completion(&mut tx, task.project_id).await?;
    tx.commit().await?;

    tracing::info!(
        task_id = task.id,
        project_id = task.project_id,
        name = %task.name,
        "Task created",
    );
    Ok(TaskWrite {
        task,
        projects: vec![project],
    })
}

/// Apply a full replace or partial update to a task.
///
/// When the change moves the task to another project, the task is
/// validated against the new project's range and both projects are
/// recomputed.
pub async fn update_task(pool: &PgPool, id: DbId, change: &TaskChange) -> AppResult<TaskWrite<Task>> {
    let now = Utc::now();
    let snapshot = TaskRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    let target = change.target_project(&snapshot);
    let affected = projects_to_recompute(Some(snapshot.project_id), Some(target));

    let mut tx = pool.begin().await?;
    let mut locked = Vec::with_capacity(affected.len());
    for project_id in &affected {
        locked.push(lock_project(&mut tx, *project_id).await?);
    }
    let current = lock_task(&mut tx, id, snapshot.project_id).await?;

    let draft = change.resolve(&current);
    let owner = locked
        .iter()
        .find(|p| p.id == draft.project_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "target project {} of task {id} was not locked",
                draft.project_id
            )))
        })?;
    validate_task(&draft, &owner.span(), now).into_result()?;

    let task = TaskRepo::update(&mut tx, id, &draft)
        .await
        .map_err(|e| map_unique_violation(e, UQ_TASKS_PROJECT_ID_NAME, || duplicate_name(&draft)))?
        .ok_or_else(|| task_not_found(id))?;

    let mut projects = Vec::with_capacity(affected.len());
    for project_id in affected {
        projects.push(propagate_completion(&mut tx, project_id).await?);
    }
    tx.commit().await?;

    if current.project_id != task.project_id {
        tracing::info!(
            task_id = id,
            from_project = current.project_id,
            to_project = task.project_id,
            "Task reassigned",
        );
    }
    tracing::info!(
        task_id = id,
        project_id = task.project_id,
        name = %task.name,
        "Task updated",
    );
    Ok(TaskWrite { task, projects })
}

/// Delete a task and recompute the project it belonged to.
pub async fn delete_task(pool: &PgPool, id: DbId) -> AppResult<TaskWrite<()>> {
    let snapshot = TaskRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    let mut tx = pool.begin().await?;
    lock_project(&mut tx, snapshot.project_id).await?;
    lock_task(&mut tx, id, snapshot.project_id).await?;

    if !TaskRepo::delete(&mut tx, id).await? {
        return Err(task_not_found(id));
    }
    let project = propagate_completion(&mut tx, snapshot.project_id).await?;
    tx.commit().await?;

    tracing::info!(
        task_id = id,
        project_id = snapshot.project_id,
        name = %snapshot.name,
        "Task deleted",
    );
    Ok(TaskWrite {
        task: (),
        projects: vec![project],
    })
}

/// Lock a task row after its project(s) are locked.
///
/// The project locks were chosen from an unlocked read; if the task moved
/// in between, the caller holds the wrong locks and must retry.
async fn lock_task(
    conn: &mut sqlx::PgConnection,
    id: DbId,
    expected_project: DbId,
) -> AppResult<Task> {
    let task = TaskRepo::lock(conn, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    if task.project_id != expected_project {
        return Err(AppError::ConcurrentModification(format!(
            "Task {id} was moved to another project by a concurrent write"
        )));
    }
    Ok(task)
}
