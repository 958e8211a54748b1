//! Search-form validation outcomes

use std::fmt;

/// Which kind of form rule rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Custom,
}

/// A form field rejected by one of its rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    /// Column key of the field.
    pub field: String,
    pub rule: RuleKind,
    /// Message configured on the rule, shown under the field.
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a full form before submission.
///
/// Search bars never validate and are always `Valid`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ValidationResult {
    #[default]
    Valid,
    /// At most one error per field, in field order.
    Invalid(Vec<FieldValidationError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> &[FieldValidationError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// The message to show under a field, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub(crate) fn from_errors(errors: Vec<FieldValidationError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }
}
