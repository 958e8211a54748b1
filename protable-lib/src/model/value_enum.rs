//! Ordered value-enum mapping

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::StatusType;
use super::Value;

/// Sentinel enum key meaning "no filter".
pub const ALL_KEY: &str = "all";

/// Label (and optional badge status) for one enum key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusType>,
}

impl EnumEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: None,
        }
    }

    pub fn with_status(text: impl Into<String>, status: StatusType) -> Self {
        Self {
            text: text.into(),
            status: Some(status),
        }
    }
}

/// A selectable option derived from a value enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumOption {
    pub value: String,
    pub text: String,
}

/// Ordered mapping from raw value to label.
///
/// Keys are compared against the string form of the raw value, so `1` and
/// `"1"` hit the same entry. Declaration order is kept for filter and select
/// options.
///
/// ```
/// use protable_lib::model::{StatusType, Value, ValueEnum};
///
/// let status = ValueEnum::new()
///     .with("all", "All")
///     .with_status("open", "Open", StatusType::Processing)
///     .with_status("closed", "Closed", StatusType::Success);
///
/// assert_eq!(status.lookup(&Value::from("open")).unwrap().text, "Open");
/// assert_eq!(status.filter_options().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueEnum {
    entries: Vec<(String, EnumEntry)>,
}

impl ValueEnum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain label.
    pub fn with(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_entry(key, EnumEntry::new(text))
    }

    /// Adds a label rendered as a status badge.
    pub fn with_status(self, key: impl Into<String>, text: impl Into<String>, status: StatusType) -> Self {
        self.with_entry(key, EnumEntry::with_status(text, status))
    }

    /// Adds or replaces an entry, keeping the position of a replaced key.
    pub fn with_entry(mut self, key: impl Into<String>, entry: EnumEntry) -> Self {
        self.insert(key.into(), entry);
        self
    }

    fn insert(&mut self, key: String, entry: EnumEntry) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
    }

    /// Returns the entry for an enum key.
    pub fn get(&self, key: &str) -> Option<&EnumEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Returns the entry for a raw cell value.
    pub fn lookup(&self, value: &Value) -> Option<&EnumEntry> {
        match value {
            Value::Null | Value::List(_) | Value::Record(_) => None,
            other => self.get(&other.to_string()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnumEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries as options, in declaration order.
    pub fn options(&self) -> Vec<EnumOption> {
        self.iter()
            .map(|(value, entry)| EnumOption {
                value: value.to_string(),
                text: entry.text.clone(),
            })
            .collect()
    }

    /// Options usable as table filters: everything but the `"all"` sentinel.
    pub fn filter_options(&self) -> Vec<EnumOption> {
        self.options()
            .into_iter()
            .filter(|option| option.value != ALL_KEY)
            .collect()
    }
}

impl<K: Into<String>, T: Into<String>> FromIterator<(K, T)> for ValueEnum {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ValueEnum::new(), |acc, (key, text)| acc.with(key, text))
    }
}

// =============================================================================
// Serde
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum EntrySpec {
    Text(String),
    Entry(EnumEntry),
}

impl Serialize for ValueEnum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValueEnum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ValueEnum;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of enum keys to labels or {text, status} objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ValueEnum, A::Error> {
                let mut value_enum = ValueEnum::new();
                while let Some((key, spec)) = access.next_entry::<String, EntrySpec>()? {
                    let entry = match spec {
                        EntrySpec::Text(text) => EnumEntry::new(text),
                        EntrySpec::Entry(entry) => entry,
                    };
                    value_enum.insert(key, entry);
                }
                Ok(value_enum)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
