//! Validation rules for full-form mode.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::FieldValidationError;
use crate::error::RuleKind;
use crate::error::ValidationResult;
use crate::model::Value;

type CustomCheck = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// One validation rule attached to a column's form item.
#[derive(Clone)]
pub enum FieldRule {
    /// Value must be present and non-blank.
    Required { message: String },
    /// String values must have at least `min` characters.
    MinLength { min: usize, message: String },
    /// String values must have at most `max` characters.
    MaxLength { max: usize, message: String },
    /// String values must match the pattern.
    Pattern { regex: Regex, message: String },
    Custom { check: CustomCheck, message: String },
}

impl FieldRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::MaxLength {
            max,
            message: message.into(),
        }
    }

    /// Compiles a pattern rule.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    pub fn custom<F>(check: F, message: impl Into<String>) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self::Custom {
            check: Arc::new(check),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Required { .. } => RuleKind::Required,
            Self::MinLength { .. } => RuleKind::MinLength,
            Self::MaxLength { .. } => RuleKind::MaxLength,
            Self::Pattern { .. } => RuleKind::Pattern,
            Self::Custom { .. } => RuleKind::Custom,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Required { message }
            | Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Pattern { message, .. }
            | Self::Custom { message, .. } => message,
        }
    }

    /// Checks a field value. Empty values only fail `Required` and custom rules.
    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        let text = value.filter(|v| !v.is_null()).map(|v| v.to_string());
        let passed = match self {
            Self::Required { .. } => text.as_deref().is_some_and(|t| !t.trim().is_empty()),
            Self::MinLength { min, .. } => text.as_deref().is_none_or(|t| t.is_empty() || t.chars().count() >= *min),
            Self::MaxLength { max, .. } => text.as_deref().is_none_or(|t| t.chars().count() <= *max),
            Self::Pattern { regex, .. } => text.as_deref().is_none_or(|t| t.is_empty() || regex.is_match(t)),
            Self::Custom { check, .. } => check(value),
        };
        if passed {
            Ok(())
        } else {
            Err(self.message().to_string())
        }
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { message } => f.debug_struct("Required").field("message", message).finish(),
            Self::MinLength { min, message } => f
                .debug_struct("MinLength")
                .field("min", min)
                .field("message", message)
                .finish(),
            Self::MaxLength { max, message } => f
                .debug_struct("MaxLength")
                .field("max", max)
                .field("message", message)
                .finish(),
            Self::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Self::Custom { message, .. } => f.debug_struct("Custom").field("message", message).finish(),
        }
    }
}

/// Collects the first failing rule of each field.
///
/// ```
/// use protable_lib::model::Value;
/// use protable_lib::search::{FieldRule, Validator};
///
/// let name = Value::from("");
/// let result = Validator::new()
///     .field("name", Some(&name), &[FieldRule::required("Name is required")])
///     .validate();
/// assert!(result.is_invalid());
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks one field against its rules.
    pub fn field(mut self, key: &str, value: Option<&Value>, rules: &[FieldRule]) -> Self {
        if let Some(rule) = rules.iter().find(|rule| rule.check(value).is_err()) {
            self.errors
                .push(FieldValidationError::new(key, rule.kind(), rule.message()));
        }
        self
    }

    pub fn validate(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors)
    }
}
