//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Reads outside a write take `&PgPool`; anything that participates in a
//! write transaction takes `&mut PgConnection` so callers can pass
//! `&mut *tx`.

pub mod project_repo;
pub mod task_repo;

pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
