//! Repository for the `projects` table.

use sqlx::{PgConnection, PgPool};
use taskflow_core::types::DbId;
use taskflow_core::validation::ProjectDraft;

use crate::models::project::Project;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, start_date, end_date, finished, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// A new project has no tasks, so it is stored as finished.
    pub async fn create(conn: &mut PgConnection, draft: &ProjectDraft) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, start_date, end_date, finished)
             VALUES ($1, $2, $3, $4, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .fetch_one(conn)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project and take a row-level write lock on it for the rest of
    /// the transaction. Concurrent task writes on the same project serialize
    /// here.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Overwrite the client-editable columns with a resolved draft.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $2,
                description = $3,
                start_date = $4,
                end_date = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .fetch_optional(conn)
            .await
    }

    /// Persist the derived `finished` flag. The row is written even when the
    /// value is unchanged so `updated_at` always moves.
    pub async fn set_finished(
        conn: &mut PgConnection,
        id: DbId,
        finished: bool,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET finished = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(finished)
            .fetch_optional(conn)
            .await
    }

    /// Delete a project. Its tasks go with it through the
    /// `ON DELETE CASCADE` foreign key. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
