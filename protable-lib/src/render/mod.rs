//! Cell formatting
//!
//! Maps a raw value and its value type to a [`Cell`] the host renderer can
//! draw. [`render_text`] is the pure formatter; [`render_cell`] runs a whole
//! column pipeline (enum relabeling, `render_text` hooks, copy text and the
//! custom `render` override).

mod cell;
mod date;
mod money;
mod percent;

pub use cell::*;
pub use date::*;
pub use money::*;
pub use percent::*;

use crate::model::Column;
use crate::model::ColumnValueType;
use crate::model::DescriptorKind;
use crate::model::MoneyLocale;
use crate::model::Record;
use crate::model::ResolvedValueType;
use crate::model::Value;
use crate::model::ValueEnum;
use crate::model::ValueType;
use crate::model::ValueTypeDescriptor;
use crate::model::progress_status;

/// Formats one value.
///
/// * `index` - zero-based row position, used by index columns
/// * `row` - the row, required for resolver value types
/// * `empty_text` - placeholder for empty values; `None` or `""` disables it
pub fn render_text(
    value: &Value,
    value_type: &ColumnValueType,
    index: usize,
    row: Option<&Record>,
    empty_text: Option<&str>,
) -> Cell {
    match value_type {
        ColumnValueType::Tag(tag) => render_tag(value, *tag, index, empty_text),
        ColumnValueType::Descriptor(descriptor) => render_descriptor(value, descriptor),
        ColumnValueType::Resolver(_) => match value_type.resolve(row) {
            Some(ResolvedValueType::Tag(tag)) => render_tag(value, tag, index, empty_text),
            Some(ResolvedValueType::Descriptor(descriptor)) => render_descriptor(value, &descriptor),
            None => fallback(value, empty_text),
        },
    }
}

fn render_tag(value: &Value, tag: ValueType, index: usize, empty_text: Option<&str>) -> Cell {
    let has_amount = value.is_truthy() || value.as_f64() == Some(0.0);
    match tag {
        ValueType::Money if has_amount => match format_money_value(value, MoneyLocale::Default) {
            Some(text) => Cell::Money(text),
            None => fallback(value, empty_text),
        },
        ValueType::Date | ValueType::DateTime | ValueType::Time if value.is_truthy() => {
            let pattern = tag.date_pattern().unwrap_or("%Y-%m-%d");
            match format_date(value, pattern) {
                Some(text) => Cell::Text(text),
                None => {
                    log::warn!("Unparseable {tag} value: {value}");
                    fallback(value, empty_text)
                }
            }
        }
        ValueType::DateRange | ValueType::DateTimeRange => match value.as_list() {
            Some([start, end]) => {
                let pattern = tag.date_pattern().unwrap_or("%Y-%m-%d");
                Cell::Lines(vec![range_half(start, pattern), range_half(end, pattern)])
            }
            _ => fallback(value, empty_text),
        },
        ValueType::Index | ValueType::IndexBorder => {
            let rank = index + 1;
            Cell::Index {
                rank,
                bordered: tag == ValueType::IndexBorder,
                top_three: rank > 2,
            }
        }
        ValueType::Progress => {
            let percent = value.as_f64();
            Cell::Progress {
                percent,
                status: progress_status(percent),
            }
        }
        ValueType::Percent => render_percent(value, false, None),
        ValueType::Avatar => match value {
            Value::String(src) => Cell::Avatar { src: src.clone() },
            _ => fallback(value, empty_text),
        },
        ValueType::Code if value.is_truthy() => Cell::Code(value.to_string()),
        _ => fallback(value, empty_text),
    }
}

fn range_half(value: &Value, pattern: &str) -> String {
    if !value.is_truthy() {
        return "-".to_string();
    }
    format_date(value, pattern).unwrap_or_else(|| value.to_string())
}

fn render_descriptor(value: &Value, descriptor: &ValueTypeDescriptor) -> Cell {
    match descriptor.kind {
        DescriptorKind::Progress => {
            let percent = value.as_f64();
            Cell::Progress {
                percent,
                status: descriptor.status.unwrap_or_else(|| progress_status(percent)),
            }
        }
        DescriptorKind::Money => match format_money_value(value, descriptor.locale) {
            Some(text) => Cell::Money(text),
            None => Cell::from_value(value.clone()),
        },
        DescriptorKind::Percent => render_percent(value, descriptor.show_symbol, descriptor.precision),
    }
}

/// Placeholder for values that are not boolean, not numeric and falsy.
fn fallback(value: &Value, empty_text: Option<&str>) -> Cell {
    match empty_text {
        Some(placeholder)
            if !placeholder.is_empty() && !value.is_bool() && !value.is_number() && !value.is_truthy() =>
        {
            Cell::Text(placeholder.to_string())
        }
        _ => Cell::from_value(value.clone()),
    }
}

// =============================================================================
// Enum relabeling
// =============================================================================

/// A raw value after value-enum relabeling.
#[derive(Debug, Clone, PartialEq)]
pub enum Relabeled {
    /// The label, or the raw value when no entry matched.
    Value(Value),
    /// A label to be shown as a status badge.
    Status(Cell),
}

/// Replaces a raw value with its enum label.
///
/// In `pure` mode a status entry yields only its label, which is what copy
/// text needs.
pub fn relabel(value: &Value, value_enum: Option<&ValueEnum>, pure: bool) -> Relabeled {
    let Some(entry) = value_enum.and_then(|e| e.lookup(value)) else {
        return Relabeled::Value(value.clone());
    };
    match entry.status {
        Some(status) if !pure => Relabeled::Status(Cell::Status {
            text: entry.text.clone(),
            status,
        }),
        _ => Relabeled::Value(Value::from(entry.text.as_str())),
    }
}

// =============================================================================
// Column pipeline
// =============================================================================

/// Renders the cell of `column` for one row.
pub fn render_cell(column: &Column, row: &Record, index: usize, empty_text: Option<&str>) -> CellOutput {
    let raw = column.value_in(row).cloned().unwrap_or(Value::Null);
    let value_enum = column.value_enum.as_ref();

    let mut cell = match relabel(&raw, value_enum, false) {
        Relabeled::Status(cell) => cell,
        Relabeled::Value(value) => {
            let value = column.apply_render_text(value, row, index);
            render_text(&value, &column.value_type, index, Some(row), empty_text)
        }
    };

    let copy_text = column.copyable.then(|| match relabel(&raw, value_enum, true) {
        Relabeled::Value(value) => column.apply_render_text(value, row, index).to_string(),
        Relabeled::Status(cell) => cell.plain_text(),
    });

    if let Some(render) = &column.render {
        cell = render(cell, row, index);
    }

    CellOutput {
        cell,
        copy_text,
        ellipsis: column.ellipsis,
        copyable: column.copyable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProgressStatus;
    use crate::model::StatusType;

    fn tag(t: ValueType) -> ColumnValueType {
        ColumnValueType::Tag(t)
    }

    #[test]
    fn test_money_zero_and_empty() {
        assert_eq!(
            render_text(&Value::from(0i64), &tag(ValueType::Money), 0, None, Some("-")),
            Cell::Money("¥0.00".into())
        );
        assert_eq!(
            render_text(&Value::Null, &tag(ValueType::Money), 0, None, Some("-")),
            Cell::text("-")
        );
        assert_eq!(
            render_text(&Value::from("12.5"), &tag(ValueType::Money), 0, None, None),
            Cell::Money("¥12.50".into())
        );
    }

    #[test]
    fn test_date_range_halves() {
        let value = Value::from(vec![Value::from("2024-01-02"), Value::Null]);
        assert_eq!(
            render_text(&value, &tag(ValueType::DateRange), 0, None, Some("-")),
            Cell::Lines(vec!["2024-01-02".into(), "-".into()])
        );
        assert_eq!(
            render_text(&Value::Null, &tag(ValueType::DateTime), 0, None, None),
            Cell::Empty
        );
    }

    #[test]
    fn test_index_ranks() {
        assert_eq!(
            render_text(&Value::Null, &tag(ValueType::IndexBorder), 2, None, None),
            Cell::Index {
                rank: 3,
                bordered: true,
                top_three: true
            }
        );
        assert_eq!(
            render_text(&Value::Null, &tag(ValueType::Index), 1, None, None),
            Cell::Index {
                rank: 2,
                bordered: false,
                top_three: false
            }
        );
    }

    #[test]
    fn test_progress_from_string_is_exception() {
        assert_eq!(
            render_text(&Value::from("50"), &tag(ValueType::Progress), 0, None, None),
            Cell::Progress {
                percent: None,
                status: ProgressStatus::Exception
            }
        );
    }

    #[test]
    fn test_fallback_keeps_zero_and_false() {
        let text = tag(ValueType::Text);
        assert_eq!(
            render_text(&Value::from(0i64), &text, 0, None, Some("-")),
            Cell::Raw(Value::Int(0))
        );
        assert_eq!(
            render_text(&Value::from(false), &text, 0, None, Some("-")),
            Cell::Raw(Value::Bool(false))
        );
        assert_eq!(render_text(&Value::from(""), &text, 0, None, Some("-")), Cell::text("-"));
        assert_eq!(render_text(&Value::from(""), &text, 0, None, Some("")), Cell::text(""));
    }

    #[test]
    fn test_resolver_descriptor() {
        let vt = ColumnValueType::resolver(|row| {
            let status = if row.get_string("state").ok().flatten() == Some("failed") {
                ProgressStatus::Exception
            } else {
                ProgressStatus::Active
            };
            ResolvedValueType::Descriptor(ValueTypeDescriptor::progress().with_status(status))
        });
        let row = Record::new().set("state", "failed");
        assert_eq!(
            render_text(&Value::from(40i64), &vt, 0, Some(&row), None),
            Cell::Progress {
                percent: Some(40.0),
                status: ProgressStatus::Exception
            }
        );
    }

    #[test]
    fn test_relabel_pure_and_decorated() {
        let value_enum = ValueEnum::new().with_status("1", "Running", StatusType::Processing);
        assert_eq!(
            relabel(&Value::from(1i64), Some(&value_enum), true),
            Relabeled::Value(Value::from("Running"))
        );
        assert_eq!(
            relabel(&Value::from(1i64), Some(&value_enum), false),
            Relabeled::Status(Cell::Status {
                text: "Running".into(),
                status: StatusType::Processing
            })
        );
        assert_eq!(
            relabel(&Value::from(2i64), Some(&value_enum), false),
            Relabeled::Value(Value::from(2i64))
        );
    }
}
