//! Normalization of submitted search values.

use std::collections::BTreeMap;

use super::DateFormatter;
use super::SearchField;
use crate::fetch::QueryParams;
use crate::model::ALL_KEY;
use crate::model::Value;
use crate::model::ValueType;
use crate::render::parse_datetime;

/// Turns raw field values into request parameters.
///
/// * null values are dropped
/// * `"all"` is dropped for fields with a value enum
/// * date fields are formatted per `formatter`, element-wise for ranges
/// * everything else passes through unchanged
pub fn convert_values(
    values: &BTreeMap<String, Value>,
    fields: &[SearchField],
    formatter: DateFormatter,
) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in values {
        let field = fields.iter().find(|f| &f.key == key);
        if value.is_null() {
            continue;
        }
        let has_enum = field.is_some_and(|f| f.value_enum.is_some());
        if has_enum && value.as_str() == Some(ALL_KEY) {
            continue;
        }
        let value_type = field.map(|f| f.value_type).unwrap_or_default();
        let converted = if value_type.is_date() {
            convert_date(value, value_type, formatter)
        } else {
            value.clone()
        };
        params.insert(key.clone(), converted);
    }
    params
}

fn convert_date(value: &Value, value_type: ValueType, formatter: DateFormatter) -> Value {
    if formatter == DateFormatter::Off {
        return value.clone();
    }
    match value.as_list() {
        Some([start, end]) => Value::List(vec![
            convert_instant(start, value_type, formatter),
            convert_instant(end, value_type, formatter),
        ]),
        _ => convert_instant(value, value_type, formatter),
    }
}

fn convert_instant(value: &Value, value_type: ValueType, formatter: DateFormatter) -> Value {
    let Some(instant) = parse_datetime(value) else {
        if !value.is_null() {
            log::warn!("Search value {value} is not a {value_type}, passing it through");
        }
        return value.clone();
    };
    match formatter {
        DateFormatter::String => {
            let pattern = value_type.date_pattern().unwrap_or("%Y-%m-%d %H:%M:%S");
            Value::String(instant.format(pattern).to_string())
        }
        DateFormatter::Number => Value::Int(instant.timestamp_millis()),
        DateFormatter::Off => value.clone(),
    }
}
