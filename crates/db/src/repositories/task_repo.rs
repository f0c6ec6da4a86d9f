//! Repository for the `tasks` table.

use sqlx::{PgConnection, PgPool};
use taskflow_core::completion::TaskProgress;
use taskflow_core::types::{DateSpan, DbId, Timestamp};
use taskflow_core::validation::TaskDraft;

use crate::models::task::Task;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, start_date, end_date, \
    unfinished, finished, created_at, updated_at";

/// Provides CRUD operations for tasks, plus the per-project reads used by
/// completion propagation and range checks.
pub struct TaskRepo;

impl TaskRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new task, returning the created row.
    pub async fn create(conn: &mut PgConnection, draft: &TaskDraft) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (project_id, name, description, start_date, end_date, unfinished, finished)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(draft.project_id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .bind(draft.unfinished)
            .bind(draft.finished)
            .fetch_one(conn)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task and lock its row for the rest of the transaction.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all tasks ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// List the tasks of one project, earliest start first.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a task with a resolved draft, including its owning project.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        draft: &TaskDraft,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                project_id = $2,
                name = $3,
                description = $4,
                start_date = $5,
                end_date = $6,
                unfinished = $7,
                finished = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(draft.project_id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .bind(draft.unfinished)
            .bind(draft.finished)
            .fetch_optional(conn)
            .await
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Per-project reads ────────────────────────────────────────────

    /// Completion flags of every task currently owned by a project.
    pub async fn progress_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<TaskProgress>, sqlx::Error> {
        let rows: Vec<(bool, bool)> =
            sqlx::query_as("SELECT unfinished, finished FROM tasks WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(conn)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(unfinished, finished)| TaskProgress {
                unfinished,
                finished,
            })
            .collect())
    }

    /// Date spans of every task currently owned by a project.
    pub async fn spans_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<DateSpan>, sqlx::Error> {
        let rows: Vec<(Timestamp, Option<Timestamp>)> =
            sqlx::query_as("SELECT start_date, end_date FROM tasks WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(conn)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(start, end)| DateSpan::new(start, end))
            .collect())
    }
}
