//! Percentage cells

use super::Cell;
use crate::model::Value;

/// Reads a percentage, stripping a `%` before numeric coercion.
pub fn percent_value(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) if s.contains('%') => Value::from(s.replacen('%', "", 1)).to_number(),
        other => other.to_number(),
    }
}

/// Sign symbol shown in front of a percentage.
pub fn sign_symbol(value: f64) -> Option<char> {
    if value > 0.0 {
        Some('+')
    } else if value < 0.0 {
        Some('-')
    } else {
        None
    }
}

/// Renders a percentage cell; non-numeric input passes through.
pub fn render_percent(value: &Value, show_symbol: bool, precision: Option<usize>) -> Cell {
    match percent_value(value) {
        Some(number) => Cell::Percent {
            value: number,
            symbol: if show_symbol { sign_symbol(number) } else { None },
            precision: precision.filter(|p| *p > 0),
        },
        None => Cell::from_value(value.clone()),
    }
}

/// Text form of a percentage cell.
///
/// With a symbol the magnitude is shown, since the symbol carries the sign.
pub fn percent_text(value: f64, symbol: Option<char>, precision: Option<usize>) -> String {
    let shown = if symbol.is_some() { value.abs() } else { value };
    let number = match precision {
        Some(p) if p > 0 => format!("{shown:.p$}"),
        _ => Value::Float(shown).to_string(),
    };
    match symbol {
        Some(symbol) => format!("{symbol}{number}%"),
        None => format!("{number}%"),
    }
}
