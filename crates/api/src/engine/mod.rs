//! Write orchestration for projects and tasks.
//!
//! Every write follows the same sequence inside one transaction: lock the
//! affected project row(s), resolve the candidate draft, validate, persist,
//! and for task writes run completion propagation before committing. A
//! failure at any step rolls the whole write back.

pub mod projects;
pub mod propagation;
pub mod tasks;

use sqlx::PgConnection;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::project::Project;
use taskflow_db::repositories::ProjectRepo;

use crate::error::{sqlstate, AppError, AppResult};

/// Lock a project row for the current transaction, or fail with `NotFound`.
async fn lock_project(conn: &mut PgConnection, id: DbId) -> AppResult<Project> {
    ProjectRepo::lock(conn, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Translate a violation of the unique constraint `constraint` into a
/// [`CoreError::Conflict`]. Any other error is passed through as a storage
/// error.
fn map_unique_violation(
    err: sqlx::Error,
    constraint: &str,
    message: impl FnOnce() -> String,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(sqlstate::UNIQUE_VIOLATION)
            && db_err.constraint() == Some(constraint)
        {
            return AppError::Core(CoreError::Conflict(message()));
        }
    }
    AppError::Database(err)
}
