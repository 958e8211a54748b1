//! Dynamic row record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::DataPath;
use super::Value;
use crate::error::FieldError;

/// One row as returned by a data source: field name to [`Value`].
///
/// Columns read cells through [`get_path`](Record::get_path); the typed
/// `get_*` getters tell a missing field apart from a `null` one.
///
/// # Example
///
/// ```
/// use protable_lib::model::Record;
///
/// let row = Record::new()
///     .set("name", "Lakeside order")
///     .set("amount", 1_250i64);
///
/// assert_eq!(row.get_string("name").unwrap(), Some("Lakeside order"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a record from a JSON object.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match Value::from(json) {
            Value::Record(record) => Some(*record),
            _ => None,
        }
    }

    /// Converts the record back into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Resolves a possibly nested data path.
    ///
    /// Every intermediate segment must resolve to a nested record, or to a
    /// list when the segment is a numeric index; anything else short-circuits
    /// to `None`.
    pub fn get_path(&self, path: &DataPath) -> Option<&Value> {
        let mut segments = path.segments().into_iter();
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = match current {
                Value::Record(record) => record.fields.get(segment)?,
                Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Removes a field.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    fn typed<'a, T>(
        &'a self,
        field: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(value) => extract(value)
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, expected, value.type_name())),
        }
    }

    /// Gets a string field.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        self.typed(field, "string", Value::as_str)
    }

    /// Gets a boolean field.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        self.typed(field, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Gets an integer field.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        self.typed(field, "int", |v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
    }

    /// Gets any numeric field as `f64`.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        self.typed(field, "number", Value::as_f64)
    }

    /// Gets a decimal field. Integers are widened.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        self.typed(field, "decimal", |v| match v {
            Value::Decimal(d) => Some(*d),
            Value::Int(i) => Some(Decimal::from(*i)),
            _ => None,
        })
    }

    /// Gets a date-time field.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.typed(field, "datetime", |v| match v {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        })
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<HashMap<String, Value>> for Record {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Record {
        Record::from_json(serde_json::json!({
            "name": "Contoso",
            "owner": {"profile": {"city": "Oslo"}, "tags": ["a", "b"]},
            "empty": null
        }))
        .unwrap()
    }

    #[test]
    fn test_get_path_nested() {
        let row = nested();
        assert_eq!(
            row.get_path(&DataPath::from("owner.profile.city")),
            Some(&Value::from("Oslo"))
        );
        assert_eq!(
            row.get_path(&DataPath::from(vec!["owner", "tags", "1"])),
            Some(&Value::from("b"))
        );
    }

    #[test]
    fn test_get_path_short_circuits() {
        let row = nested();
        assert_eq!(row.get_path(&DataPath::from("owner.missing.city")), None);
        assert_eq!(row.get_path(&DataPath::from("empty.inner")), None);
        assert_eq!(row.get_path(&DataPath::from("name.length")), None);
        assert_eq!(row.get_path(&DataPath::from("empty")), Some(&Value::Null));
    }

    #[test]
    fn test_typed_getters() {
        let row = nested().set("count", 3i64);
        assert_eq!(row.get_string("name").unwrap(), Some("Contoso"));
        assert_eq!(row.get_i64("count").unwrap(), Some(3));
        assert_eq!(row.get_string("empty").unwrap(), None);
        assert_eq!(row.get_i64("missing"), Err(FieldError::missing("missing")));
        assert_eq!(row.get_i64("missing").unwrap_err().field(), "missing");
        assert!(matches!(
            row.get_bool("name"),
            Err(FieldError::TypeMismatch { actual: "string", .. })
        ));
    }
}
