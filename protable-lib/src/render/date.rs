//! Date parsing and formatting

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Utc;

use crate::model::Value;

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Interprets a value as a UTC date-time.
///
/// Accepts date-time values, epoch milliseconds and strings in RFC 3339,
/// `YYYY-MM-DD HH:mm:ss`, `YYYY-MM-DD` or `HH:mm:ss` form. A bare time lands
/// on 1970-01-01.
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Int(ms) => DateTime::from_timestamp_millis(*ms),
        Value::Float(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
        Value::String(s) => parse_datetime_str(s.trim()),
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return Some(NaiveDateTime::new(NaiveDate::default(), time).and_utc());
    }
    None
}

/// Formats a value with a `chrono` pattern, or `None` if it is not a date.
pub fn format_date(value: &Value, pattern: &str) -> Option<String> {
    parse_datetime(value).map(|dt| dt.format(pattern).to_string())
}
