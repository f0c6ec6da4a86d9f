//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::completion::TaskProgress;
use taskflow_core::text::{normalize_description, normalize_name};
use taskflow_core::types::{DateSpan, DbId, Timestamp};
use taskflow_core::validation::task::default_completion_flags;
use taskflow_core::validation::TaskDraft;

use super::nullable;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub unfinished: bool,
    pub finished: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }

    pub fn progress(&self) -> TaskProgress {
        TaskProgress {
            unfinished: self.unfinished,
            finished: self.finished,
        }
    }
}

/// DTO for creating a new task, also used as a full-replace body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to the time of the request if omitted.
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    /// If only one flag is given the other defaults to its complement; if
    /// neither is given the task starts unfinished.
    pub unfinished: Option<bool>,
    pub finished: Option<bool>,
}

impl CreateTask {
    pub fn to_draft(&self, now: Timestamp) -> TaskDraft {
        let (unfinished, finished) = default_completion_flags(self.unfinished, self.finished);
        TaskDraft {
            project_id: self.project_id,
            name: normalize_name(&self.name),
            description: normalize_description(self.description.clone()),
            start_date: self.start_date.unwrap_or(now),
            end_date: self.end_date,
            unfinished,
            finished,
        }
    }

    /// Draft replacing `current` wholesale. An omitted start date keeps the
    /// persisted one.
    pub fn replace(&self, current: &Task) -> TaskDraft {
        self.to_draft(current.start_date)
    }
}

/// DTO for updating an existing task. All fields are optional; a new
/// `project_id` reassigns the task. An explicit `null` on `description` or
/// `end_date` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub project_id: Option<DbId>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<Timestamp>>,
    pub unfinished: Option<bool>,
    pub finished: Option<bool>,
}

impl UpdateTask {
    /// Merge the supplied fields onto the persisted row. Missing completion
    /// flags keep their stored values.
    pub fn merge_onto(&self, current: &Task) -> TaskDraft {
        TaskDraft {
            project_id: self.project_id.unwrap_or(current.project_id),
            name: self
                .name
                .as_deref()
                .map(normalize_name)
                .unwrap_or_else(|| current.name.clone()),
            description: match &self.description {
                Some(d) => normalize_description(d.clone()),
                None => current.description.clone(),
            },
            start_date: self.start_date.unwrap_or(current.start_date),
            end_date: self.end_date.unwrap_or(current.end_date),
            unfinished: self.unfinished.unwrap_or(current.unfinished),
            finished: self.finished.unwrap_or(current.finished),
        }
    }
}

/// A write against an existing task: full replace (`PUT`) or partial
/// update (`PATCH`).
#[derive(Debug, Clone)]
pub enum TaskChange {
    Replace(CreateTask),
    Patch(UpdateTask),
}

impl TaskChange {
    pub fn resolve(&self, current: &Task) -> TaskDraft {
        match self {
            TaskChange::Replace(input) => input.replace(current),
            TaskChange::Patch(input) => input.merge_onto(current),
        }
    }

    /// The project that will own the task once this change is applied.
    pub fn target_project(&self, current: &Task) -> DbId {
        match self {
            TaskChange::Replace(input) => input.project_id,
            TaskChange::Patch(input) => input.project_id.unwrap_or(current.project_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn stored() -> Task {
        Task {
            id: 10,
            project_id: 1,
            name: "Tarea Test".into(),
            description: None,
            start_date: ts(2023, 2, 1),
            end_date: None,
            unfinished: true,
            finished: false,
            created_at: ts(2023, 2, 1),
            updated_at: ts(2023, 2, 1),
        }
    }

    fn create(project_id: DbId) -> CreateTask {
        CreateTask {
            project_id,
            name: "Tarea".into(),
            description: None,
            start_date: Some(ts(2023, 3, 1)),
            end_date: None,
            unfinished: None,
            finished: None,
        }
    }

    #[test]
    fn create_defaults_to_unfinished() {
        let draft = create(1).to_draft(ts(2024, 1, 1));
        assert!(draft.unfinished);
        assert!(!draft.finished);
    }

    #[test]
    fn create_with_finished_only_derives_complement() {
        let input = CreateTask {
            finished: Some(true),
            ..create(1)
        };
        let draft = input.to_draft(ts(2024, 1, 1));
        assert!(!draft.unfinished);
        assert!(draft.finished);
    }

    #[test]
    fn patch_resolves_missing_flags_from_stored_row() {
        let patch = UpdateTask {
            finished: Some(true),
            ..Default::default()
        };
        let draft = patch.merge_onto(&stored());
        // The stored `unfinished = true` is kept, so validation will reject.
        assert!(draft.unfinished);
        assert!(draft.finished);
    }

    #[test]
    fn patch_null_clears_end_date_and_description() {
        let current = Task {
            description: Some("Notas".into()),
            end_date: Some(ts(2023, 3, 1)),
            ..stored()
        };
        let patch: UpdateTask =
            serde_json::from_str(r#"{"end_date": null, "description": null}"#).unwrap();
        let draft = patch.merge_onto(&current);
        assert_eq!(draft.end_date, None);
        assert_eq!(draft.description, None);

        let keep: UpdateTask = serde_json::from_str("{}").unwrap();
        let draft = keep.merge_onto(&current);
        assert_eq!(draft.end_date, Some(ts(2023, 3, 1)));
        assert_eq!(draft.description.as_deref(), Some("Notas"));
    }

    #[test]
    fn patch_without_project_keeps_owner() {
        let change = TaskChange::Patch(UpdateTask::default());
        assert_eq!(change.target_project(&stored()), 1);
        assert_eq!(change.resolve(&stored()).project_id, 1);
    }

    #[test]
    fn replace_can_reassign() {
        let change = TaskChange::Replace(create(2));
        assert_eq!(change.target_project(&stored()), 2);
        assert_eq!(change.resolve(&stored()).project_id, 2);
    }
}
