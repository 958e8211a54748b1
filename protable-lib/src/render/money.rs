//! Locale-aware currency formatting

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::FromPrimitive;

use crate::model::MoneyLocale;
use crate::model::Value;

const NBSP: char = '\u{a0}';

/// Reads an amount from a numeric value or numeric string.
pub fn money_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::from_f64(*f),
        Value::Decimal(d) => Some(*d),
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(Decimal::from_f64))
        }
        _ => None,
    }
}

/// Formats a value as currency, or `None` when it is not a number.
pub fn format_money_value(value: &Value, locale: MoneyLocale) -> Option<String> {
    money_amount(value).map(|amount| format_money(amount, locale))
}

/// Formats an amount with two fraction digits in the given locale.
///
/// ```
/// use rust_decimal::Decimal;
/// use protable_lib::model::MoneyLocale;
/// use protable_lib::render::format_money;
///
/// assert_eq!(format_money(Decimal::new(123456, 2), MoneyLocale::EnUs), "$1,234.56");
/// ```
pub fn format_money(amount: Decimal, locale: MoneyLocale) -> String {
    let mut rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    rounded.rescale(2);
    let digits = rounded.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match locale {
        MoneyLocale::Default => format!("{sign}¥{}.{frac_part}", group_digits(int_part, ',')),
        MoneyLocale::EnUs => format!("{sign}${}.{frac_part}", group_digits(int_part, ',')),
        MoneyLocale::MsMy => format!("{sign}RM{}.{frac_part}", group_digits(int_part, ',')),
        MoneyLocale::RuRu => format!(
            "{sign}{},{frac_part}{NBSP}₽",
            group_digits(int_part, NBSP)
        ),
    }
}

/// Inserts a separator every three digits, counting from the right.
fn group_digits(digits: &str, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(separator);
        }
        result.push(*c);
    }

    result
}
