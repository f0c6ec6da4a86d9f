use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskflow_core::error::CoreError;

/// PostgreSQL SQLSTATE codes the API distinguishes.
pub mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const CHECK_VIOLATION: &str = "23514";
    pub const SERIALIZATION_FAILURE: &str = "40001";
    pub const DEADLOCK_DETECTED: &str = "40P01";
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds storage and write-contention
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The rows a write locked no longer match what it read before locking.
    /// Transient: the same request can succeed on retry.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, message and whether the client may retry.
struct Classified {
    status: StatusCode,
    code: &'static str,
    message: String,
    retryable: bool,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            retryable: false,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }

    fn storage_failure() -> Self {
        Self::retryable("The storage layer is temporarily unavailable; retry the request")
    }

    fn retryable(message: impl Into<String>) -> Self {
        Self {
            retryable: true,
            ..Self::new(StatusCode::SERVICE_UNAVAILABLE, "STORAGE_FAILURE", message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut violations = None;

        let classified = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => Classified::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(report) => {
                    violations = Some(json!(report));
                    Classified::new(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        report.to_string(),
                    )
                }
                CoreError::Conflict(msg) => {
                    Classified::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    Classified::internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Transient write contention ---
            AppError::ConcurrentModification(msg) => {
                tracing::warn!(error = %msg, "Write lost a race with a concurrent update");
                Classified::retryable(format!("{msg}; retry the request"))
            }
        };

        let mut body = json!({
            "error": classified.message,
            "code": classified.code,
        });
        if let Some(violations) = violations {
            body["violations"] = violations;
        }
        if classified.retryable {
            body["retryable"] = json!(true);
        }

        (classified.status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` and foreign key violations map to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Check constraint violations map to 400.
/// - Pool exhaustion, I/O failures, serialization failures and deadlocks
///   map to 503 and are flagged retryable.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => {
            Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            let constraint = db_err.constraint().unwrap_or("unknown");
            match code.as_deref() {
                Some(sqlstate::UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                    Classified::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    )
                }
                Some(sqlstate::FOREIGN_KEY_VIOLATION) => Classified::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Referenced record does not exist: {constraint}"),
                ),
                Some(sqlstate::CHECK_VIOLATION) => Classified::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                ),
                Some(sqlstate::SERIALIZATION_FAILURE | sqlstate::DEADLOCK_DETECTED) => {
                    tracing::warn!(error = %db_err, "Transient database conflict");
                    Classified::storage_failure()
                }
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    Classified::internal()
                }
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::error!(error = %err, "Database unavailable");
            Classified::storage_failure()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Classified::internal()
        }
    }
}
