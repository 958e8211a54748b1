//! Renderable cell descriptions

use crate::model::ProgressStatus;
use crate::model::StatusType;
use crate::model::Value;

/// What a host renderer should draw for one table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Nothing to draw.
    Empty,
    /// Plain text.
    Text(String),
    /// Stacked lines, used by date ranges.
    Lines(Vec<String>),
    /// Row position badge. `top_three` is set for ranks above 2.
    Index {
        rank: usize,
        bordered: bool,
        top_three: bool,
    },
    /// Progress bar. `percent` is `None` for non-numeric input.
    Progress {
        percent: Option<f64>,
        status: ProgressStatus,
    },
    /// Percentage with optional sign symbol and fixed precision.
    Percent {
        value: f64,
        symbol: Option<char>,
        precision: Option<usize>,
    },
    /// Formatted currency amount.
    Money(String),
    /// Label with a status badge.
    Status { text: String, status: StatusType },
    Avatar { src: String },
    Code(String),
    Link {
        text: String,
        target: Option<String>,
    },
    /// Several cells side by side, e.g. an option column's actions.
    Group(Vec<Cell>),
    /// Raw value handed to the host unchanged.
    Raw(Value),
}

impl Cell {
    /// Passes a value through untouched.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::String(s) => Cell::Text(s),
            other => Cell::Raw(other),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text(text.into())
    }

    pub fn link(text: impl Into<String>, target: impl Into<String>) -> Self {
        Cell::Link {
            text: text.into(),
            target: Some(target.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Flattens the cell into text, for terminals and clipboards.
    pub fn plain_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) | Cell::Money(text) | Cell::Code(text) => text.clone(),
            Cell::Lines(lines) => lines.join("\n"),
            Cell::Index { rank, .. } => rank.to_string(),
            Cell::Progress { percent, status } => match percent {
                Some(p) => format!("{}%", Value::Float(*p)),
                None => status.as_str().to_string(),
            },
            Cell::Percent {
                value,
                symbol,
                precision,
            } => super::percent::percent_text(*value, *symbol, *precision),
            Cell::Status { text, .. } => text.clone(),
            Cell::Avatar { src } => src.clone(),
            Cell::Link { text, .. } => text.clone(),
            Cell::Group(cells) => cells
                .iter()
                .map(Cell::plain_text)
                .collect::<Vec<_>>()
                .join(" "),
            Cell::Raw(value) => value.to_string(),
        }
    }
}

/// A rendered column cell plus the decorations the host applies around it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellOutput {
    pub cell: Cell,
    /// Undecorated label for copy-to-clipboard, set on copyable columns.
    pub copy_text: Option<String>,
    pub ellipsis: bool,
    pub copyable: bool,
}
