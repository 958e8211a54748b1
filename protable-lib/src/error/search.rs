//! Search submission errors

use super::FieldValidationError;

/// Reasons a search submission produced no parameter object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Full-form mode validation rejected the values.
    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<FieldValidationError>),

    /// The table was built without a search form.
    #[error("Search is disabled")]
    Disabled,
}

impl SearchError {
    /// Returns the field errors of a validation failure.
    pub fn field_errors(&self) -> &[FieldValidationError] {
        match self {
            Self::Validation(errors) => errors,
            Self::Disabled => &[],
        }
    }
}

fn format_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
