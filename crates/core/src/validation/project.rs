//! Project validation.

use validator::Validate;

use crate::types::{DateSpan, Timestamp};

use super::rules::{FieldViolation, Rule, ValidationReport};
use super::{check_description, check_name, check_schedule};

/// A fully resolved project candidate: defaults applied on create, patch
/// fields merged onto the persisted row on update.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProjectDraft {
    #[validate(length(max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
}

impl ProjectDraft {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }
}

/// Check a project candidate against every field and cross-field rule.
///
/// Rule order: schedule, name, description.
pub fn validate_project(draft: &ProjectDraft, now: Timestamp) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_schedule(&mut report, "Project", draft.span(), now);
    check_name(&mut report, "Project name", &draft.name, draft.validate());
    check_description(&mut report, draft.description.as_deref());
    report
}

/// Check that a project's (possibly new) range still contains all of its
/// existing tasks.
pub fn validate_project_covers_tasks(draft: &ProjectDraft, tasks: &[DateSpan]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let early = tasks
        .iter()
        .filter(|t| t.start < draft.start_date || t.end.is_some_and(|end| end < draft.start_date))
        .count();
    if early > 0 {
        report.push(FieldViolation::new(
            "start_date",
            Rule::OutsideProjectRange,
            format!("{early} task(s) would start or end before the project's start date"),
        ));
    }

    if let Some(project_end) = draft.end_date {
        let late = tasks
            .iter()
            .filter(|t| t.start > project_end || t.end.is_some_and(|end| end > project_end))
            .count();
        if late > 0 {
            report.push(FieldViolation::new(
                "end_date",
                Rule::OutsideProjectRange,
                format!("{late} task(s) would start or end after the project's end date"),
            ));
        }
    }

    report
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

    fn draft(name: &str) -> ProjectDraft {
        ProjectDraft {
            name: name.to_string(),
            description: None,
            start_date: ts(2023, 1, 1),
            end_date: Some(ts(2023, 12, 31)),
        }
    }

    fn rules(report: &ValidationReport) -> Vec<Rule> {
        report.violations().iter().map(|v| v.rule).collect()
    }

    #[test]
    fn valid_project_passes() {
        let report = validate_project(&draft("Proyecto Test"), now());
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn revalidating_accepted_project_still_passes() {
        let project = draft("Proyecto Test");
        assert!(validate_project(&project, now()).is_valid());
        assert!(validate_project(&project, now() + Duration::days(365)).is_valid());
    }

    #[test]
    fn start_in_future_rejected() {
        let mut p = draft("Future");
        p.start_date = now() + Duration::hours(1);
        p.end_date = None;
        let report = validate_project(&p, now());
        assert_eq!(rules(&report), vec![Rule::StartInFuture]);
        assert_eq!(report.violations()[0].field, "start_date");
    }

    #[test]
    fn start_equal_to_now_accepted() {
        let mut p = draft("Now");
        p.start_date = now();
        p.end_date = None;
        assert!(validate_project(&p, now()).is_valid());
    }

    #[test]
    fn end_before_start_rejected() {
        let mut p = draft("Backwards");
        p.end_date = Some(ts(2022, 12, 31));
        let report = validate_project(&p, now());
        assert_eq!(rules(&report), vec![Rule::EndBeforeStart]);
    }

    #[test]
    fn punctuation_in_name_rejected() {
        let report = validate_project(&draft("Proyecto!!"), now());
        assert_eq!(rules(&report), vec![Rule::InvalidCharacters]);
    }

    #[test]
    fn blank_name_reported_once_as_required() {
        let report = validate_project(&draft("   "), now());
        assert_eq!(rules(&report), vec![Rule::Required]);
    }

    #[test]
    fn overlong_name_rejected() {
        let report = validate_project(&draft(&"a".repeat(256)), now());
        assert_eq!(rules(&report), vec![Rule::TooLong]);
        assert_eq!(
            report.violations()[0].message,
            "Project name cannot exceed 255 characters"
        );
    }

    #[test]
    fn all_violations_reported_in_rule_order() {
        let p = ProjectDraft {
            name: "Bad@Name".into(),
            description: Some("<script>".into()),
            start_date: now() + Duration::days(1),
            end_date: Some(now()),
        };
        let report = validate_project(&p, now());
        assert_eq!(
            rules(&report),
            vec![
                Rule::StartInFuture,
                Rule::EndBeforeStart,
                Rule::InvalidCharacters,
                Rule::InvalidCharacters,
            ]
        );
        assert_eq!(report.violations()[2].field, "name");
        assert_eq!(report.violations()[3].field, "description");
    }

    #[test]
    fn empty_description_is_ignored() {
        let mut p = draft("Quiet");
        p.description = Some(String::new());
        assert!(validate_project(&p, now()).is_valid());
    }

    #[test]
    fn covering_range_accepts_contained_tasks() {
        let tasks = [
            DateSpan::new(ts(2023, 2, 1), None),
            DateSpan::new(ts(2023, 3, 1), Some(ts(2023, 4, 1))),
        ];
        assert!(validate_project_covers_tasks(&draft("P"), &tasks).is_valid());
    }

    #[test]
    fn shrinking_range_past_tasks_rejected() {
        let tasks = [
            DateSpan::new(ts(2023, 2, 1), Some(ts(2023, 11, 1))),
            DateSpan::new(ts(2023, 6, 1), None),
        ];
        let mut p = draft("P");
        p.start_date = ts(2023, 3, 1);
        p.end_date = Some(ts(2023, 5, 1));

        let report = validate_project_covers_tasks(&p, &tasks);
        assert_eq!(
            rules(&report),
            vec![Rule::OutsideProjectRange, Rule::OutsideProjectRange]
        );
        assert_eq!(report.violations()[0].field, "start_date");
        assert_eq!(report.violations()[1].field, "end_date");
        assert!(report.violations()[1].message.starts_with("2 task(s)"));
    }

    #[test]
    fn open_ended_project_covers_any_later_task() {
        let tasks = [DateSpan::new(ts(2030, 1, 1), Some(ts(2031, 1, 1)))];
        let mut p = draft("P");
        p.end_date = None;
        assert!(validate_project_covers_tasks(&p, &tasks).is_valid());
    }
}
