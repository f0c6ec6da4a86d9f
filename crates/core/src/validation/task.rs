//! Task validation.

use validator::Validate;

use crate::types::{DateSpan, DbId, Timestamp};

use super::rules::{FieldViolation, Rule, ValidationReport};
use super::{check_description, check_name, check_schedule};

/// A fully resolved task candidate.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct TaskDraft {
    pub project_id: DbId,
    #[validate(length(max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub unfinished: bool,
    pub finished: bool,
}

impl TaskDraft {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }
}

/// Resolve the completion flags of a new task.
///
/// Neither supplied: a new task is unfinished. One supplied: the other is
/// its complement. Both supplied: taken as given and left to validation.
pub fn default_completion_flags(unfinished: Option<bool>, finished: Option<bool>) -> (bool, bool) {
    match (unfinished, finished) {
        (Some(u), Some(f)) => (u, f),
        (Some(u), None) => (u, !u),
        (None, Some(f)) => (!f, f),
        (None, None) => (true, false),
    }
}

/// Check a task candidate against every rule, including containment in the
/// owning project's current date span.
///
/// Rule order: name, description, completion flags, schedule, containment.
pub fn validate_task(draft: &TaskDraft, project: &DateSpan, now: Timestamp) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_name(&mut report, "Task name", &draft.name, draft.validate());
    check_description(&mut report, draft.description.as_deref());
    check_completion_flags(&mut report, draft.unfinished, draft.finished);
    check_schedule(&mut report, "Task", draft.span(), now);
    check_containment(&mut report, &draft.span(), project);
    report
}

fn check_completion_flags(report: &mut ValidationReport, unfinished: bool, finished: bool) {
    let message = match (unfinished, finished) {
        (true, true) => "A task cannot be both unfinished and finished",
        (false, false) => "A task must be either unfinished or finished",
        _ => return,
    };
    report.push(FieldViolation::new("finished", Rule::CompletionFlags, message));
}

fn check_containment(report: &mut ValidationReport, task: &DateSpan, project: &DateSpan) {
    if task.start < project.start {
        report.push(FieldViolation::new(
            "start_date",
            Rule::OutsideProjectRange,
            "Task start date cannot be before the project's start date",
        ));
    }
    if let Some(project_end) = project.end {
        if task.start > project_end {
            report.push(FieldViolation::new(
                "start_date",
                Rule::OutsideProjectRange,
                "Task start date cannot be after the project's end date",
            ));
        }
    }

    let Some(task_end) = task.end else {
        return;
    };
    if task_end < project.start {
        report.push(FieldViolation::new(
            "end_date",
            Rule::OutsideProjectRange,
            "Task end date cannot be before the project's start date",
        ));
    }
    if let Some(project_end) = project.end {
        if task_end > project_end {
            report.push(FieldViolation::new(
                "end_date",
                Rule::OutsideProjectRange,
                "Task end date cannot be after the project's end date",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn now() -> Timestamp {
        ts(2024, 6, 1)
    }

    fn project() -> DateSpan {
        DateSpan::new(ts(2023, 1, 1), Some(ts(2023, 12, 31)))
    }

    fn draft() -> TaskDraft {
        TaskDraft {
            project_id: 1,
            name: "Tarea Test".into(),
            description: Some("Write the first draft, then review it.".into()),
            start_date: ts(2023, 2, 1),
            end_date: None,
            unfinished: true,
            finished: false,
        }
    }

    fn rules(report: &ValidationReport) -> Vec<Rule> {
        report.violations().iter().map(|v| v.rule).collect()
    }

    #[test]
    fn valid_task_passes() {
        assert!(validate_task(&draft(), &project(), now()).is_valid());
    }

    #[test]
    fn finished_task_passes() {
        let t = TaskDraft {
            unfinished: false,
            finished: true,
            ..draft()
        };
        assert!(validate_task(&t, &project(), now()).is_valid());
    }

    #[test]
    fn both_flags_set_rejected() {
        let t = TaskDraft {
            finished: true,
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::CompletionFlags]);
        assert_eq!(
            report.violations()[0].message,
            "A task cannot be both unfinished and finished"
        );
    }

    #[test]
    fn neither_flag_set_rejected() {
        let t = TaskDraft {
            unfinished: false,
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::CompletionFlags]);
    }

    #[test]
    fn start_before_project_rejected() {
        let t = TaskDraft {
            start_date: ts(2022, 12, 1),
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::OutsideProjectRange]);
        assert_eq!(report.violations()[0].field, "start_date");
    }

    #[test]
    fn start_after_project_end_rejected() {
        let t = TaskDraft {
            start_date: ts(2024, 1, 15),
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::OutsideProjectRange]);
    }

    #[test]
    fn end_after_project_end_rejected() {
        let t = TaskDraft {
            end_date: Some(ts(2024, 1, 15)),
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::OutsideProjectRange]);
        assert_eq!(report.violations()[0].field, "end_date");
    }

    #[test]
    fn end_before_own_start_rejected() {
        let t = TaskDraft {
            start_date: ts(2023, 3, 1),
            end_date: Some(ts(2023, 2, 1)),
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::EndBeforeStart]);
    }

    #[test]
    fn open_ended_project_accepts_late_task() {
        let open = DateSpan::new(ts(2023, 1, 1), None);
        let t = TaskDraft {
            start_date: ts(2024, 5, 1),
            end_date: Some(ts(2030, 1, 1)),
            ..draft()
        };
        assert!(validate_task(&t, &open, now()).is_valid());
    }

    #[test]
    fn task_start_in_future_rejected() {
        let open = DateSpan::new(ts(2023, 1, 1), None);
        let t = TaskDraft {
            start_date: now() + Duration::days(2),
            ..draft()
        };
        let report = validate_task(&t, &open, now());
        assert_eq!(rules(&report), vec![Rule::StartInFuture]);
    }

    #[test]
    fn task_on_project_boundaries_accepted() {
        let t = TaskDraft {
            start_date: ts(2023, 1, 1),
            end_date: Some(ts(2023, 12, 31)),
            ..draft()
        };
        assert!(validate_task(&t, &project(), now()).is_valid());
    }

    #[test]
    fn invalid_name_reported_with_task_label() {
        let t = TaskDraft {
            name: "Tarea con Nombre Inválido-!@".into(),
            ..draft()
        };
        let report = validate_task(&t, &project(), now());
        assert_eq!(rules(&report), vec![Rule::InvalidCharacters]);
        assert!(report.violations()[0].message.starts_with("Task name"));
    }

    #[test]
    fn completion_flag_defaults() {
        assert_eq!(default_completion_flags(None, None), (true, false));
        assert_eq!(default_completion_flags(None, Some(true)), (false, true));
        assert_eq!(default_completion_flags(Some(false), None), (false, true));
        assert_eq!(default_completion_flags(Some(true), Some(true)), (true, true));
    }
}
