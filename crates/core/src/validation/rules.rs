//! Violation and report types shared by every validation rule.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Which rule a candidate broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Start date is later than the time of validation.
    StartInFuture,
    /// End date precedes start date.
    EndBeforeStart,
    /// Blank or missing text where a value is mandatory.
    Required,
    /// Text longer than the field allows.
    TooLong,
    /// Text with more whitespace-delimited words than allowed.
    TooManyWords,
    /// Text containing characters outside the field's allowed set.
    InvalidCharacters,
    /// `unfinished` and `finished` are both set or both clear.
    CompletionFlags,
    /// Task dates fall outside the owning project's range, or a project's
    /// new range no longer covers its tasks.
    OutsideProjectRange,
}

/// A single field-level (or cross-field) rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// Ordered list of violations produced by one validation pass.
///
/// Order follows rule evaluation order, so the same candidate always yields
/// the same report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Turn the report into a `Result`, failing with
    /// [`CoreError::Validation`] when any violation was recorded.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl From<Vec<FieldViolation>> for ValidationReport {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}
