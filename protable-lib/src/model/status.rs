//! Status tags attached to enum entries and progress cells

use serde::Deserialize;
use serde::Serialize;

/// Badge status of a value-enum entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusType {
    #[serde(alias = "success")]
    Success,
    #[serde(alias = "error")]
    Error,
    #[serde(alias = "processing")]
    Processing,
    #[serde(alias = "warning")]
    Warning,
    #[default]
    #[serde(alias = "default")]
    Default,
}

/// Display status of a progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Success,
    Exception,
    Normal,
    Active,
}

impl ProgressStatus {
    /// Lowercase name, as host renderers expect it.
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Success => "success",
            ProgressStatus::Exception => "exception",
            ProgressStatus::Normal => "normal",
            ProgressStatus::Active => "active",
        }
    }
}

/// Derives the progress status from a raw value.
///
/// `None` stands for a non-numeric value.
///
/// | value | status |
/// |-------|--------|
/// | non-numeric, `NaN`, negative | `Exception` |
/// | exactly 100 | `Success` |
/// | `0 <= v < 100` | `Active` |
/// | anything else | `Normal` |
pub fn progress_status(value: Option<f64>) -> ProgressStatus {
    match value {
        None => ProgressStatus::Exception,
        Some(v) if v.is_nan() || v < 0.0 => ProgressStatus::Exception,
        Some(v) if v == 100.0 => ProgressStatus::Success,
        Some(v) if v < 100.0 => ProgressStatus::Active,
        Some(_) => ProgressStatus::Normal,
    }
}
