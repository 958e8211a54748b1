//! Data paths into row records

use serde::Deserialize;
use serde::Serialize;

/// Location of a column's value inside a row.
///
/// A path is either a dotted string (`"owner.profile.city"`) or an explicit
/// list of segments, for field names that themselves contain dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPath {
    /// Dotted path; a name without dots addresses a top-level field.
    Dotted(String),
    /// Explicit segment list.
    Segments(Vec<String>),
}

impl DataPath {
    /// Returns the path segments.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            DataPath::Dotted(path) => path.split('.').collect(),
            DataPath::Segments(segments) => segments.iter().map(String::as_str).collect(),
        }
    }

    /// String form used when the path stands in for a column key.
    ///
    /// Segment lists are joined with `-`.
    pub fn key_string(&self) -> String {
        match self {
            DataPath::Dotted(path) => path.clone(),
            DataPath::Segments(segments) => segments.join("-"),
        }
    }

    /// Returns `true` if the path addresses nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            DataPath::Dotted(path) => path.is_empty(),
            DataPath::Segments(segments) => segments.is_empty(),
        }
    }
}

impl From<&str> for DataPath {
    fn from(path: &str) -> Self {
        DataPath::Dotted(path.to_string())
    }
}

impl From<String> for DataPath {
    fn from(path: String) -> Self {
        DataPath::Dotted(path)
    }
}

impl From<Vec<&str>> for DataPath {
    fn from(segments: Vec<&str>) -> Self {
        DataPath::Segments(segments.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for DataPath {
    fn from(segments: Vec<String>) -> Self {
        DataPath::Segments(segments)
    }
}

impl std::fmt::Display for DataPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataPath::Dotted(path) => f.write_str(path),
            DataPath::Segments(segments) => f.write_str(&segments.join(".")),
        }
    }
}
