//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::text::{normalize_description, normalize_name};
use taskflow_core::types::{DateSpan, DbId, Timestamp};
use taskflow_core::validation::ProjectDraft;

use super::nullable;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    /// Derived: true iff no task of this project is unfinished.
    pub finished: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }

    /// The persisted row as a draft, for re-validation.
    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// DTO for creating a new project, also used as a full-replace body.
///
/// `finished` is not accepted; it is derived from the project's tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to the time of the request if omitted.
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl CreateProject {
    pub fn to_draft(&self, now: Timestamp) -> ProjectDraft {
        ProjectDraft {
            name: normalize_name(&self.name),
            description: normalize_description(self.description.clone()),
            start_date: self.start_date.unwrap_or(now),
            end_date: self.end_date,
        }
    }

    /// Draft replacing `current` wholesale. Omitted optional fields are
    /// cleared; an omitted start date keeps the persisted one.
    pub fn replace(&self, current: &Project) -> ProjectDraft {
        self.to_draft(current.start_date)
    }
}

/// DTO for updating an existing project. All fields are optional;
/// `description` and `end_date` distinguish an explicit `null` (clear) from
/// an omitted field (keep).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<Timestamp>>,
}

impl UpdateProject {
    /// Merge the supplied fields onto the persisted row.
    pub fn merge_onto(&self, current: &Project) -> ProjectDraft {
        ProjectDraft {
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
        }
    }
}

/// A write against an existing project: full replace (`PUT`) or partial
/// update (`PATCH`). Both resolve to the same draft type.
#[derive(Debug, Clone)]
pub enum ProjectChange {
    Replace(CreateProject),
    Patch(UpdateProject),
}

impl ProjectChange {
    pub fn resolve(&self, current: &Project) -> ProjectDraft {
        match self {
            ProjectChange::Replace(input) => input.replace(current),
            ProjectChange::Patch(input) => input.merge_onto(current),
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

    fn stored() -> Project {
        Project {
            id: 1,
            name: "Proyecto Test".into(),
            description: Some("Original".into()),
            start_date: ts(2023, 1, 1),
            end_date: Some(ts(2023, 12, 31)),
            finished: true,
            created_at: ts(2023, 1, 1),
            updated_at: ts(2023, 1, 1),
        }
    }

    #[test]
    fn create_defaults_start_to_now_and_trims() {
        let input = CreateProject {
            name: "  Nuevo ".into(),
            description: Some("".into()),
            start_date: None,
            end_date: None,
        };
        let draft = input.to_draft(ts(2024, 5, 5));
        assert_eq!(draft.name, "Nuevo");
        assert_eq!(draft.description, None);
        assert_eq!(draft.start_date, ts(2024, 5, 5));
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let patch = UpdateProject {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let draft = patch.merge_onto(&stored());
        assert_eq!(draft.name, "Renamed");
        assert_eq!(draft.description.as_deref(), Some("Original"));
        assert_eq!(draft.span(), stored().span());
    }

    #[test]
    fn replace_clears_omitted_optionals() {
        let change = ProjectChange::Replace(CreateProject {
            name: "Proyecto Test".into(),
            description: None,
            start_date: None,
            end_date: None,
        });
        let draft = change.resolve(&stored());
        assert_eq!(draft.description, None);
        assert_eq!(draft.end_date, None);
        assert_eq!(draft.start_date, ts(2023, 1, 1));
    }

    #[test]
    fn patch_null_clears_optional_fields() {
        let patch: UpdateProject =
            serde_json::from_str(r#"{"end_date": null, "description": null}"#).unwrap();
        assert_eq!(patch.end_date, Some(None));

        let draft = patch.merge_onto(&stored());
        assert_eq!(draft.end_date, None);
        assert_eq!(draft.description, None);
        assert_eq!(draft.name, "Proyecto Test");
    }

    #[test]
    fn patch_omitted_fields_deserialize_as_keep() {
        let patch: UpdateProject = serde_json::from_str(r#"{"name": "Otro"}"#).unwrap();
        assert_eq!(patch.end_date, None);
        assert_eq!(patch.description, None);

        let draft = patch.merge_onto(&stored());
        assert_eq!(draft.end_date, Some(ts(2023, 12, 31)));
        assert_eq!(draft.description.as_deref(), Some("Original"));
    }

    #[test]
    fn patch_value_sets_end_date() {
        let patch: UpdateProject =
            serde_json::from_str(r#"{"end_date": "2023-06-30T00:00:00Z"}"#).unwrap();
        assert_eq!(patch.merge_onto(&stored()).end_date, Some(ts(2023, 6, 30)));
    }

    #[test]
    fn unchanged_patch_resolves_to_stored_row() {
        let draft = ProjectChange::Patch(UpdateProject::default()).resolve(&stored());
        assert_eq!(draft, stored().to_draft());
    }
}
