//! Row keys and row selection.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::intl::Intl;
use crate::model::Record;

/// Field holding a row's key unless configured otherwise.
pub const DEFAULT_ROW_KEY: &str = "key";

/// How a row's identity is derived.
#[derive(Clone)]
pub enum RowKey {
    /// Value of a field; the positional index when the field is absent.
    Field(String),
    /// Position among the loaded rows.
    Index,
    Fn(Arc<dyn Fn(&Record, usize) -> String + Send + Sync>),
}

impl Default for RowKey {
    fn default() -> Self {
        RowKey::Field(DEFAULT_ROW_KEY.to_string())
    }
}

impl RowKey {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Record, usize) -> String + Send + Sync + 'static,
    {
        RowKey::Fn(Arc::new(f))
    }

    pub fn key_of(&self, row: &Record, index: usize) -> String {
        match self {
            RowKey::Field(field) => match row.get(field) {
                Some(value) if !value.is_null() => value.to_string(),
                _ => index.to_string(),
            },
            RowKey::Index => index.to_string(),
            RowKey::Fn(f) => f(row, index),
        }
    }
}

impl From<String> for RowKey {
    fn from(field: String) -> Self {
        RowKey::Field(field)
    }
}

impl From<&str> for RowKey {
    fn from(field: &str) -> Self {
        RowKey::Field(field.to_string())
    }
}

impl<'de> Deserialize<'de> for RowKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RowKey::Field)
    }
}

impl fmt::Debug for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Field(field) => f.debug_tuple("Field").field(field).finish(),
            RowKey::Index => f.write_str("Index"),
            RowKey::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// Callback receiving the selected keys and rows after every change.
pub type OnSelectionChange = Arc<dyn Fn(&[String], &[Record]) + Send + Sync>;

/// Row selection options.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionConfig {
    /// Controlled selection; the host owns the keys when set.
    pub selected_row_keys: Option<Vec<String>>,

    #[serde(skip)]
    pub on_change: Option<OnSelectionChange>,
}

impl SelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selected_keys(mut self, keys: Vec<String>) -> Self {
        self.selected_row_keys = Some(keys);
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], &[Record]) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for SelectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionConfig")
            .field("selected_row_keys", &self.selected_row_keys)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// A selection change not yet reported to `on_change`.
///
/// Returned by the mutating [`RowSelection`] methods so the caller can release
/// any lock around the selection before [`notify`](Self::notify) runs host
/// code.
pub struct SelectionChange {
    keys: Vec<String>,
    rows: Vec<Record>,
    on_change: OnSelectionChange,
}

impl SelectionChange {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn notify(self) {
        (self.on_change)(&self.keys, &self.rows);
    }
}

impl fmt::Debug for SelectionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionChange")
            .field("keys", &self.keys)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

/// Summary shown above the table while rows are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionAlert {
    pub count: usize,
    /// e.g. `Selected 2 items`.
    pub text: String,
    pub clear_text: String,
}

/// Selected row keys.
#[derive(Debug, Clone, Default)]
pub struct RowSelection {
    keys: Vec<String>,
    controlled: bool,
    config: SelectionConfig,
}

impl RowSelection {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            keys: config.selected_row_keys.clone().unwrap_or_default(),
            controlled: config.selected_row_keys.is_some(),
            config,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Loaded rows whose keys are selected, in row order.
    pub fn selected_rows(&self, rows: &[Record], row_key: &RowKey) -> Vec<Record> {
        rows.iter()
            .enumerate()
            .filter(|(index, row)| self.is_selected(&row_key.key_of(row, *index)))
            .map(|(_, row)| row.clone())
            .collect()
    }

    /// Applies a selection made by the user; the returned change is for
    /// `on_change`.
    ///
    /// A controlled selection keeps its keys; the host passes the new keys
    /// back through [`set_controlled_keys`](Self::set_controlled_keys).
    #[must_use]
    pub fn select(&mut self, keys: Vec<String>, rows: &[Record], row_key: &RowKey) -> Option<SelectionChange> {
        let change = self.config.on_change.clone().map(|on_change| SelectionChange {
            rows: rows
                .iter()
                .enumerate()
                .filter(|(index, row)| keys.contains(&row_key.key_of(row, *index)))
                .map(|(_, row)| row.clone())
                .collect(),
            keys: keys.clone(),
            on_change,
        });
        if !self.controlled {
            self.keys = keys;
        }
        change
    }

    /// Adds or removes one key.
    #[must_use]
    pub fn toggle(&mut self, key: &str, rows: &[Record], row_key: &RowKey) -> Option<SelectionChange> {
        let mut keys = self.keys.clone();
        match keys.iter().position(|k| k == key) {
            Some(position) => {
                keys.remove(position);
            }
            None => keys.push(key.to_string()),
        }
        self.select(keys, rows, row_key)
    }

    pub fn set_controlled_keys(&mut self, keys: Vec<String>) {
        self.controlled = true;
        self.keys = keys;
    }

    /// Drops the keys without notifying.
    pub(crate) fn reset_keys(&mut self) {
        if !self.controlled {
            self.keys.clear();
        }
    }

    /// Clears the selection; the returned change carries empty lists.
    #[must_use]
    pub fn clear(&mut self) -> Option<SelectionChange> {
        self.reset_keys();
        self.config.on_change.clone().map(|on_change| SelectionChange {
            keys: Vec::new(),
            rows: Vec::new(),
            on_change,
        })
    }

    pub fn alert(&self, intl: &dyn Intl) -> Option<SelectionAlert> {
        if self.keys.is_empty() {
            return None;
        }
        let count = self.keys.len();
        Some(SelectionAlert {
            count,
            text: format!(
                "{} {count} {}",
                intl.get_message("alert.selected", "Selected"),
                intl.get_message("alert.item", "items"),
            ),
            clear_text: intl.get_message("alert.clear", "Clear"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::intl::IntlMap;

    fn notify(change: Option<SelectionChange>) {
        if let Some(change) = change {
            change.notify();
        }
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::new().set("key", "a"),
            Record::new().set("id", 7i64),
            Record::new().set("key", "c"),
        ]
    }

    #[test]
    fn test_row_key_strategies() {
        let rows = rows();
        assert_eq!(RowKey::default().key_of(&rows[0], 0), "a");
        assert_eq!(RowKey::default().key_of(&rows[1], 1), "1");
        assert_eq!(RowKey::from("id").key_of(&rows[1], 1), "7");
        assert_eq!(RowKey::Index.key_of(&rows[2], 2), "2");
        let upper = RowKey::func(|row, _| row.get("key").map(|v| v.to_string().to_uppercase()).unwrap_or_default());
        assert_eq!(upper.key_of(&rows[2], 2), "C");
    }

    #[test]
    fn test_select_and_rows() {
        let rows = rows();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = SelectionConfig::new().on_change(move |keys, rows| {
            sink.lock().unwrap().push((keys.len(), rows.len()));
        });
        let mut selection = RowSelection::new(config);
        let row_key = RowKey::default();

        notify(selection.select(vec!["a".into(), "1".into()], &rows, &row_key));
        assert_eq!(selection.selected_rows(&rows, &row_key).len(), 2);
        let change = selection.toggle("a", &rows, &row_key).unwrap();
        assert_eq!(change.keys(), ["1"]);
        assert_eq!(change.rows().len(), 1);
        assert_eq!(selection.keys(), ["1"]);
        change.notify();
        notify(selection.clear());
        assert!(selection.keys().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![(2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn test_controlled_keys_stay() {
        let rows = rows();
        let mut selection = RowSelection::new(SelectionConfig::new().with_selected_keys(vec!["c".into()]));
        assert!(selection.select(vec!["a".into()], &rows, &RowKey::default()).is_none());
        assert_eq!(selection.keys(), ["c"]);
        selection.set_controlled_keys(vec!["a".into()]);
        assert_eq!(selection.keys(), ["a"]);
    }

    #[test]
    fn test_alert_text() {
        let mut selection = RowSelection::default();
        assert!(selection.alert(&IntlMap::en_us()).is_none());
        notify(selection.select(vec!["a".into(), "c".into()], &rows(), &RowKey::default()));
        let alert = selection.alert(&IntlMap::en_us()).unwrap();
        assert_eq!(alert.text, "Selected 2 items");
        assert_eq!(alert.count, 2);
    }
}
