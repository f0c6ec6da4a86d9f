//! Derived completion state of a project.
//!
//! A project's `finished` flag is a pure function of its tasks' flags. The
//! API's write engine calls [`project_finished`] after every task write;
//! tests can call it directly.

use crate::types::DbId;

/// Completion flags of one stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProgress {
    pub unfinished: bool,
    pub finished: bool,
}

/// `true` iff no task is unfinished. A project without tasks is finished.
pub fn project_finished<I>(tasks: I) -> bool
where
    I: IntoIterator<Item = TaskProgress>,
{
    !tasks.into_iter().any(|t| t.unfinished)
}

/// Projects whose `finished` flag must be recomputed after a task write.
///
/// `before` is the task's owning project prior to the write (`None` on
/// create), `after` the owner once the write commits (`None` on delete). A
/// reassignment yields both ids. The result is sorted ascending, which is
/// also the order project rows must be locked in.
pub fn projects_to_recompute(before: Option<DbId>, after: Option<DbId>) -> Vec<DbId> {
    let mut ids: Vec<DbId> = before.into_iter().chain(after).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
