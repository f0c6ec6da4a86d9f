//! Shared text-safety checker for names and descriptions.
//!
//! Project and task names go through [`NAME_POLICY`], descriptions through
//! [`DESCRIPTION_POLICY`]. Both use the same [`TextPolicy::check`] so the two
//! entities can never drift apart.

use std::sync::LazyLock;

use regex::Regex;

use crate::validation::rules::{FieldViolation, Rule};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of whitespace-delimited words in a name.
pub const MAX_NAME_WORDS: usize = 20;

/// Maximum stored length of a name (column width).
pub const MAX_NAME_LENGTH: u64 = 255;

/// Maximum length of a description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 250;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\s]+$").expect("valid regex"));

static PROSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[\w\s.,!?\-'"]*$"#).expect("valid regex"));

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Character class a field may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Letters, digits, underscore and whitespace.
    Word,
    /// `Word` plus `. , ! ? - ' "`.
    Prose,
}

impl Charset {
    fn regex(self) -> &'static Regex {
        match self {
            Charset::Word => &WORD_RE,
            Charset::Prose => &PROSE_RE,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Charset::Word => "letters, digits, underscores and spaces",
            Charset::Prose => "letters, digits, spaces and . , ! ? - ' \"",
        }
    }
}

/// Limits applied to one text field.
#[derive(Debug, Clone, Copy)]
pub struct TextPolicy {
    pub max_chars: Option<usize>,
    pub max_words: Option<usize>,
    pub charset: Charset,
}

pub const NAME_POLICY: TextPolicy = TextPolicy {
    max_chars: None,
    max_words: Some(MAX_NAME_WORDS),
    charset: Charset::Word,
};

pub const DESCRIPTION_POLICY: TextPolicy = TextPolicy {
    max_chars: Some(MAX_DESCRIPTION_LENGTH),
    max_words: None,
    charset: Charset::Prose,
};

impl TextPolicy {
    /// Check `value` against this policy.
    ///
    /// `field` is the key reported in violations, `label` the human name
    /// used in messages (e.g. "Task name"). Length is counted in characters,
    /// not bytes.
    pub fn check(&self, field: &str, label: &str, value: &str) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if let Some(max) = self.max_chars {
            if value.chars().count() > max {
                violations.push(FieldViolation::new(
                    field,
                    Rule::TooLong,
                    format!("{label} cannot exceed {max} characters"),
                ));
            }
        }

        if !self.charset.regex().is_match(value) {
            violations.push(FieldViolation::new(
                field,
                Rule::InvalidCharacters,
                format!("{label} may only contain {}", self.charset.describe()),
            ));
        }

        if let Some(max) = self.max_words {
            if value.split_whitespace().count() > max {
                violations.push(FieldViolation::new(
                    field,
                    Rule::TooManyWords,
                    format!("{label} cannot exceed {max} words"),
                ));
            }
        }

        violations
    }
}

/// Strip leading and trailing whitespace from a name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Map an empty or whitespace-only description to `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}
