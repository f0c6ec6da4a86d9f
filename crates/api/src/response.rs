//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Task writes add the
//! owning project(s) as recomputed by completion propagation.

use serde::Serialize;
use taskflow_db::models::project::Project;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "projects": [...] }` returned by task create, update and
/// delete. `projects` holds every project whose `finished` flag was
/// recomputed by the write (two on reassignment).
#[derive(Debug, Serialize)]
pub struct TaskWriteResponse<T: Serialize> {
    pub data: T,
    pub projects: Vec<Project>,
}
