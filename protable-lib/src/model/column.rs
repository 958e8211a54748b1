//! Column descriptors

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::ColumnValueType;
use super::DataPath;
use super::Record;
use super::Value;
use super::ValueEnum;
use crate::render::Cell;
use crate::search::FieldRule;
use crate::search::FieldWidget;

/// Custom cell override: receives the formatted cell, the row and its index.
pub type CellRender = Arc<dyn Fn(Cell, &Record, usize) -> Cell + Send + Sync>;

/// Value hook applied after enum relabeling and before formatting.
pub type RenderText = Arc<dyn Fn(Value, &Record, usize) -> Value + Send + Sync>;

/// Table edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    Left,
    Right,
}

/// Search/form field options of a column.
#[derive(Debug, Clone, Default)]
pub struct FormItemProps {
    /// Label override; the column title is used otherwise.
    pub label: Option<String>,
    /// Validation rules, checked in full-form mode.
    pub rules: Vec<FieldRule>,
}

/// One logical field of the table.
///
/// Built with `with_*` setters:
///
/// ```
/// use protable_lib::model::{Column, FixedSide, ValueEnum, ValueType};
///
/// let status = Column::new("Status")
///     .with_data_path("status")
///     .with_value_enum(ValueEnum::new().with("all", "All").with("open", "Open"))
///     .with_initial_value("all");
///
/// let created = Column::new("Created")
///     .with_data_path("meta.created")
///     .with_value_type(ValueType::DateTime)
///     .with_fixed(FixedSide::Right)
///     .hide_in_search();
///
/// assert_eq!(created.column_key(1), "meta.created");
/// ```
#[derive(Clone, Default)]
pub struct Column {
    pub title: String,
    pub key: Option<String>,
    pub data_path: Option<DataPath>,
    pub value_type: ColumnValueType,
    pub value_enum: Option<ValueEnum>,
    pub hide_in_table: bool,
    pub hide_in_search: bool,
    pub hide_in_form: bool,
    /// Search field weight; higher sorts first, unset counts as 0.
    pub order: Option<i32>,
    pub initial_value: Option<Value>,
    pub form_item_props: FormItemProps,
    pub fixed: Option<FixedSide>,
    pub width: Option<u32>,
    pub ellipsis: bool,
    pub copyable: bool,
    /// Grouped sub-columns under this header.
    pub children: Vec<Column>,
    pub render: Option<CellRender>,
    pub render_text: Option<RenderText>,
    /// Search widget override.
    pub widget: Option<FieldWidget>,
}

impl Column {
    /// Creates a text column with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_data_path(mut self, path: impl Into<DataPath>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_value_type(mut self, value_type: impl Into<ColumnValueType>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn with_value_enum(mut self, value_enum: ValueEnum) -> Self {
        self.value_enum = Some(value_enum);
        self
    }

    pub fn hide_in_table(mut self) -> Self {
        self.hide_in_table = true;
        self
    }

    pub fn hide_in_search(mut self) -> Self {
        self.hide_in_search = true;
        self
    }

    pub fn hide_in_form(mut self) -> Self {
        self.hide_in_form = true;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.form_item_props.label = Some(label.into());
        self
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.form_item_props.rules.push(rule);
        self
    }

    pub fn with_fixed(mut self, side: FixedSide) -> Self {
        self.fixed = Some(side);
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn ellipsis(mut self) -> Self {
        self.ellipsis = true;
        self
    }

    pub fn copyable(mut self) -> Self {
        self.copyable = true;
        self
    }

    pub fn with_children(mut self, children: Vec<Column>) -> Self {
        self.children = children;
        self
    }

    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(Cell, &Record, usize) -> Cell + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn with_render_text<F>(mut self, render_text: F) -> Self
    where
        F: Fn(Value, &Record, usize) -> Value + Send + Sync + 'static,
    {
        self.render_text = Some(Arc::new(render_text));
        self
    }

    pub fn with_widget(mut self, widget: FieldWidget) -> Self {
        self.widget = Some(widget);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Key from an explicit key or the data path, if either is usable.
    pub fn explicit_key(&self) -> Option<String> {
        if let Some(key) = self.key.as_deref().filter(|k| !k.is_empty()) {
            return Some(key.to_string());
        }
        self.data_path
            .as_ref()
            .filter(|path| !path.is_empty())
            .map(DataPath::key_string)
    }

    /// Stable key of the column at position `index`.
    pub fn column_key(&self, index: usize) -> String {
        self.explicit_key().unwrap_or_else(|| index.to_string())
    }

    /// Label shown next to the search field.
    pub fn label(&self) -> &str {
        self.form_item_props.label.as_deref().unwrap_or(&self.title)
    }

    /// Raw value of this column in `row`.
    pub fn value_in<'a>(&self, row: &'a Record) -> Option<&'a Value> {
        self.data_path.as_ref().and_then(|path| row.get_path(path))
    }

    pub(crate) fn apply_render_text(&self, value: Value, row: &Record, index: usize) -> Value {
        match &self.render_text {
            Some(render_text) => render_text(value, row, index),
            None => value,
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("key", &self.key)
            .field("data_path", &self.data_path)
            .field("value_type", &self.value_type)
            .field("value_enum", &self.value_enum)
            .field("hide_in_table", &self.hide_in_table)
            .field("hide_in_search", &self.hide_in_search)
            .field("hide_in_form", &self.hide_in_form)
            .field("order", &self.order)
            .field("initial_value", &self.initial_value)
            .field("fixed", &self.fixed)
            .field("width", &self.width)
            .field("ellipsis", &self.ellipsis)
            .field("copyable", &self.copyable)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Keys that occur more than once among `columns`, in first-seen order.
///
/// Duplicates make visibility and pinning state indistinguishable; they are
/// reported and otherwise tolerated.
pub fn duplicate_keys(columns: &[Column]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for (index, column) in columns.iter().enumerate() {
        let key = column.column_key(index);
        let count = seen.entry(key.clone()).or_default();
        *count += 1;
        if *count == 2 {
            log::warn!("Duplicate column key '{key}'");
            duplicates.push(key);
        }
    }
    duplicates
}
