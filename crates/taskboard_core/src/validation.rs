//! Form input validation.
//!
//! # Responsibility
//! - Check raw form values against per-field rules.
//! - Convert accepted values into a typed submission.
//!
//! # Invariants
//! - A submission is rejected when ANY field fails its rule.
//! - All bounds are inclusive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static UNSIGNED_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\+?(\d{1,9})\s*$").expect("valid integer regex"));

/// Configurable limits applied to form submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRules {
    pub title_max_length: Option<usize>,
    pub description_min_length: usize,
    pub assignee_min: u32,
    pub assignee_max: u32,
}

impl Default for FormRules {
    fn default() -> Self {
        Self {
            title_max_length: None,
            description_min_length: 5,
            assignee_min: 1,
            assignee_max: 5,
        }
    }
}

impl FormRules {
    /// Rejects rule sets no input could ever satisfy.
    pub fn validate_bounds(&self) -> Result<(), String> {
        if self.assignee_min > self.assignee_max {
            return Err(format!(
                "assignee_min ({}) must be <= assignee_max ({})",
                self.assignee_min, self.assignee_max
            ));
        }
        if self.title_max_length == Some(0) {
            return Err("title_max_length must be > 0 when set".to_string());
        }
        Ok(())
    }
}

/// Value under validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(i64),
}

/// One value plus the rules it must satisfy. Unset rules are skipped.
///
/// Length rules only apply to text, range rules only to numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validatable<'a> {
    pub value: FieldValue<'a>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl<'a> Validatable<'a> {
    pub fn text(value: &'a str) -> Self {
        Self::of(FieldValue::Text(value))
    }

    pub fn number(value: i64) -> Self {
        Self::of(FieldValue::Number(value))
    }

    fn of(value: FieldValue<'a>) -> Self {
        Self {
            value,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
        }
    }
}

/// Returns whether `input` satisfies every rule it declares.
pub fn validate(input: &Validatable<'_>) -> bool {
    match input.value {
        FieldValue::Text(text) => {
            let length = text.chars().count();
            !(input.required && text.trim().is_empty())
                && input.min_length.map_or(true, |min| length >= min)
                && input.max_length.map_or(true, |max| length <= max)
        }
        FieldValue::Number(number) => {
            input.min.map_or(true, |min| number >= min)
                && input.max.map_or(true, |max| number <= max)
        }
    }
}

/// Form field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    AssigneeCount,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::AssigneeCount => "people",
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

/// Every field that failed in one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: Field) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|error| format!("{}: {}", error.field.as_str(), error.reason))
            .collect();
        write!(f, "invalid input ({})", parts.join("; "))
    }
}

impl Error for ValidationError {}

/// Raw values read from the form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    pub title: String,
    pub description: String,
    pub assignee_count: String,
}

/// Accepted form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub assignee_count: u32,
}

/// Validates all three fields and reports every failure at once.
pub fn validate_submission(
    raw: &RawSubmission,
    rules: &FormRules,
) -> Result<Submission, ValidationError> {
    let mut fields = Vec::new();

    let title = Validatable {
        required: true,
        max_length: rules.title_max_length,
        ..Validatable::text(&raw.title)
    };
    if !validate(&title) {
        fields.push(FieldError {
            field: Field::Title,
            reason: match rules.title_max_length {
                Some(max) => format!("required, at most {max} characters"),
                None => "required".to_string(),
            },
        });
    }

    let description = Validatable {
        required: true,
        min_length: Some(rules.description_min_length),
        ..Validatable::text(&raw.description)
    };
    if !validate(&description) {
        fields.push(FieldError {
            field: Field::Description,
            reason: format!(
                "required, at least {} characters",
                rules.description_min_length
            ),
        });
    }

    let count = parse_count(&raw.assignee_count);
    let count_valid = count.is_some_and(|value| {
        validate(&Validatable {
            min: Some(i64::from(rules.assignee_min)),
            max: Some(i64::from(rules.assignee_max)),
            ..Validatable::number(i64::from(value))
        })
    });
    if !count_valid {
        fields.push(FieldError {
            field: Field::AssigneeCount,
            reason: format!(
                "whole number between {} and {}",
                rules.assignee_min, rules.assignee_max
            ),
        });
    }

    match count {
        Some(assignee_count) if fields.is_empty() => Ok(Submission {
            title: raw.title.clone(),
            description: raw.description.clone(),
            assignee_count,
        }),
        _ => Err(ValidationError { fields }),
    }
}

fn parse_count(value: &str) -> Option<u32> {
    let captures = UNSIGNED_INT_RE.captures(value)?;
    captures.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_count, validate, validate_submission, Field, FormRules, RawSubmission, Validatable,
    };

    fn raw(title: &str, description: &str, people: &str) -> RawSubmission {
        RawSubmission {
            title: title.to_string(),
            description: description.to_string(),
            assignee_count: people.to_string(),
        }
    }

    #[test]
    fn text_rules_are_inclusive() {
        let exact = Validatable {
            required: true,
            min_length: Some(5),
            max_length: Some(5),
            ..Validatable::text("abcde")
        };
        assert!(validate(&exact));

        let blank = Validatable {
            required: true,
            ..Validatable::text("   ")
        };
        assert!(!validate(&blank));
    }

    #[test]
    fn number_rules_are_inclusive() {
        for value in [1, 5] {
            let bounded = Validatable {
                min: Some(1),
                max: Some(5),
                ..Validatable::number(value)
            };
            assert!(validate(&bounded), "{value} should be within [1,5]");
        }
        let above = Validatable {
            max: Some(5),
            ..Validatable::number(6)
        };
        assert!(!validate(&above));
    }

    #[test]
    fn accepts_valid_submission_unchanged() {
        let submission = validate_submission(
            &raw("Build bridge", "A long enough description", " 3 "),
            &FormRules::default(),
        )
        .expect("valid submission");

        assert_eq!(submission.title, "Build bridge");
        assert_eq!(submission.description, "A long enough description");
        assert_eq!(submission.assignee_count, 3);
    }

    #[test]
    fn rejects_when_any_single_field_fails() {
        let rules = FormRules::default();

        let err = validate_submission(&raw("", "long description", "2"), &rules)
            .expect_err("empty title must fail");
        assert_eq!(err.fields.len(), 1);
        assert!(err.has_field(Field::Title));

        let err = validate_submission(&raw("title", "abc", "2"), &rules)
            .expect_err("short description must fail");
        assert!(err.has_field(Field::Description));

        let err = validate_submission(&raw("title", "long description", "9"), &rules)
            .expect_err("too many people must fail");
        assert!(err.has_field(Field::AssigneeCount));
    }

    #[test]
    fn reports_every_failing_field() {
        let err = validate_submission(&raw(" ", "", "many"), &FormRules::default())
            .expect_err("all fields invalid");
        assert_eq!(err.fields.len(), 3);
        let message = err.to_string();
        assert!(message.contains("title"));
        assert!(message.contains("description"));
        assert!(message.contains("people"));
    }

    #[test]
    fn title_max_length_is_optional() {
        let rules = FormRules {
            title_max_length: Some(4),
            ..FormRules::default()
        };
        let err = validate_submission(&raw("too long", "long description", "1"), &rules)
            .expect_err("long title must fail");
        assert!(err.has_field(Field::Title));
    }

    #[test]
    fn parse_count_accepts_plain_integers_only() {
        assert_eq!(parse_count("4"), Some(4));
        assert_eq!(parse_count("+2"), Some(2));
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn rules_reject_inverted_bounds() {
        let rules = FormRules {
            assignee_min: 6,
            assignee_max: 5,
            ..FormRules::default()
        };
        assert!(rules.validate_bounds().is_err());
        assert!(FormRules::default().validate_bounds().is_ok());
    }
}
