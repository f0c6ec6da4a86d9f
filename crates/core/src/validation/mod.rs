//! Business-rule validation for projects and tasks.
//!
//! Validators are pure: they take a fully resolved draft, the related state
//! they need (the owning project's span for tasks) and the current time, and
//! return a [`ValidationReport`](rules::ValidationReport). Uniqueness is not
//! checked here; the store's constraints own it.

pub mod project;
pub mod rules;
pub mod task;

use validator::ValidationErrors;

use crate::text::{self, DESCRIPTION_POLICY, NAME_POLICY};
use crate::types::{DateSpan, Timestamp};

use rules::{FieldViolation, Rule, ValidationReport};

pub use project::{validate_project, validate_project_covers_tasks, ProjectDraft};
pub use task::{validate_task, TaskDraft};

/// Start must not be in the future; end must not precede start.
fn check_schedule(report: &mut ValidationReport, subject: &str, span: DateSpan, now: Timestamp) {
    if span.start > now {
        report.push(FieldViolation::new(
            "start_date",
            Rule::StartInFuture,
            format!("{subject} start date cannot be in the future"),
        ));
    }
    if let Some(end) = span.end {
        if end < span.start {
            report.push(FieldViolation::new(
                "end_date",
                Rule::EndBeforeStart,
                format!("{subject} end date cannot be before its start date"),
            ));
        }
    }
}

/// Name rules: non-blank, column width (from the draft's `validator`
/// derive), then the shared text policy.
fn check_name(
    report: &mut ValidationReport,
    label: &str,
    name: &str,
    length: Result<(), ValidationErrors>,
) {
    if name.trim().is_empty() {
        report.push(FieldViolation::new(
            "name",
            Rule::Required,
            format!("{label} is required"),
        ));
        return;
    }

    if let Err(errors) = length {
        if errors.field_errors().contains_key("name") {
            report.push(FieldViolation::new(
                "name",
                Rule::TooLong,
                format!("{label} cannot exceed {} characters", text::MAX_NAME_LENGTH),
            ));
        }
    }

    for violation in NAME_POLICY.check("name", label, name) {
        report.push(violation);
    }
}

fn check_description(report: &mut ValidationReport, description: Option<&str>) {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return;
    };
    for violation in DESCRIPTION_POLICY.check("description", "Description", description) {
        report.push(violation);
    }
}
