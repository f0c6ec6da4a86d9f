//! Domain logic for the project/task tracker.
//!
//! Everything in this crate is pure: validation rules, the shared text
//! checker and the completion recompute. Storage lives in `taskflow-db`.

pub mod completion;
pub mod error;
pub mod text;
pub mod types;
pub mod validation;
