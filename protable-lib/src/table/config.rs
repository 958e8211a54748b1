//! Table configuration.

use std::time::Duration;

use serde::Deserialize;
use serde::Deserializer;

use super::ColumnsStateMap;
use super::Density;
use super::Pagination;
use super::RowKey;
use super::SelectionConfig;
use super::ToolbarOptions;
use crate::error::ConfigError;
use crate::fetch::QueryParams;
use crate::search::DateFormatter;
use crate::search::SearchConfig;
use crate::search::SearchMode;

/// Placeholder for empty cells.
pub const DEFAULT_EMPTY_TEXT: &str = "-";

/// A JSON option that is either a switch or a settings object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    Flag(bool),
    Config(T),
}

/// Whether the table lists rows or is a bare form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    #[default]
    Table,
    /// Only the search form, as a validated full form.
    Form,
}

/// Configuration for a [`ProTable`](super::ProTable).
///
/// Loadable from camelCase JSON; callbacks are attached on the builder.
///
/// # Example
///
/// ```
/// use protable_lib::table::TableConfig;
///
/// let config = TableConfig::from_json_str(r#"{
///     "pagination": { "defaultPageSize": 10 },
///     "search": false,
///     "columnEmptyText": "n/a",
///     "rowKey": "id"
/// }"#).unwrap();
///
/// assert_eq!(config.pagination.fetch_defaults(), (1, 10));
/// assert_eq!(config.column_empty_text.as_deref(), Some("n/a"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    #[serde(rename = "type")]
    pub table_type: TableType,

    /// Search form settings; `None` hides the search bar.
    ///
    /// Default: a search bar with default settings
    #[serde(deserialize_with = "search_setting")]
    pub search: Option<SearchConfig>,

    pub pagination: Pagination,

    /// Row selection; `None` disables it.
    ///
    /// Default: None
    #[serde(deserialize_with = "selection_setting")]
    pub row_selection: Option<SelectionConfig>,

    #[serde(deserialize_with = "date_formatter_setting")]
    pub date_formatter: DateFormatter,

    /// Placeholder for empty cells; `None` shows them empty.
    ///
    /// Default: `-`
    #[serde(deserialize_with = "empty_text_setting")]
    pub column_empty_text: Option<String>,

    /// Default: the `key` field
    pub row_key: RowKey,

    /// Debounce window of re-fetch triggers in milliseconds.
    ///
    /// Default: 200
    pub debounce_ms: u64,

    /// Extra parameters sent with every fetch, after the search values.
    pub params: QueryParams,

    pub size: Density,

    #[serde(deserialize_with = "toolbar_setting")]
    pub options: ToolbarOptions,

    pub columns_state_map: ColumnsStateMap,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_type: TableType::Table,
            search: Some(SearchConfig::default()),
            pagination: Pagination::default(),
            row_selection: None,
            date_formatter: DateFormatter::default(),
            column_empty_text: Some(DEFAULT_EMPTY_TEXT.to_string()),
            row_key: RowKey::default(),
            debounce_ms: 200,
            params: QueryParams::new(),
            size: Density::default(),
            options: ToolbarOptions::default(),
            columns_state_map: ColumnsStateMap::new(),
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.debounce_ms > 60_000 {
            return Err(ConfigError::invalid(format!(
                "debounceMs {} exceeds one minute",
                config.debounce_ms
            )));
        }
        Ok(config)
    }

    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = Some(search);
        self
    }

    pub fn without_search(mut self) -> Self {
        self.search = None;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_row_selection(mut self, selection: SelectionConfig) -> Self {
        self.row_selection = Some(selection);
        self
    }

    pub fn with_date_formatter(mut self, formatter: DateFormatter) -> Self {
        self.date_formatter = formatter;
        self
    }

    pub fn with_empty_text(mut self, text: Option<String>) -> Self {
        self.column_empty_text = text;
        self
    }

    pub fn with_row_key(mut self, row_key: impl Into<RowKey>) -> Self {
        self.row_key = row_key.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = debounce.as_millis() as u64;
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_size(mut self, size: Density) -> Self {
        self.size = size;
        self
    }

    pub fn with_options(mut self, options: ToolbarOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_columns_state(mut self, map: ColumnsStateMap) -> Self {
        self.columns_state_map = map;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The search surface implied by the table type and search setting.
    pub fn search_mode(&self) -> SearchMode {
        match (self.table_type, &self.search) {
            (TableType::Form, search) => SearchMode::Form(search.clone().unwrap_or_default()),
            (TableType::Table, Some(search)) => SearchMode::Bar(search.clone()),
            (TableType::Table, None) => SearchMode::Disabled,
        }
    }
}

fn search_setting<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SearchConfig>, D::Error> {
    Ok(match Toggle::deserialize(d)? {
        Toggle::Flag(false) => None,
        Toggle::Flag(true) => Some(SearchConfig::default()),
        Toggle::Config(config) => Some(config),
    })
}

fn selection_setting<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SelectionConfig>, D::Error> {
    Ok(match Toggle::deserialize(d)? {
        Toggle::Flag(false) => None,
        Toggle::Flag(true) => Some(SelectionConfig::default()),
        Toggle::Config(config) => Some(config),
    })
}

fn date_formatter_setting<'de, D: Deserializer<'de>>(d: D) -> Result<DateFormatter, D::Error> {
    Ok(match Toggle::deserialize(d)? {
        Toggle::Flag(false) => DateFormatter::Off,
        Toggle::Flag(true) => DateFormatter::default(),
        Toggle::Config(formatter) => formatter,
    })
}

fn empty_text_setting<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Toggle::deserialize(d)? {
        Toggle::Flag(false) => None,
        Toggle::Flag(true) => Some(DEFAULT_EMPTY_TEXT.to_string()),
        Toggle::Config(text) => Some(text),
    })
}

fn toolbar_setting<'de, D: Deserializer<'de>>(d: D) -> Result<ToolbarOptions, D::Error> {
    Toggle::deserialize(d).map(ToolbarOptions::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixedSide;
    use crate::search::SpanConfig;

    #[test]
    fn test_defaults() {
        let config = TableConfig::from_json_str("{}").unwrap();
        assert_eq!(config.column_empty_text.as_deref(), Some("-"));
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert!(config.row_selection.is_none());
        assert!(matches!(config.search_mode(), SearchMode::Bar(_)));
        assert_eq!(config.size, Density::Middle);
    }

    #[test]
    fn test_switches() {
        let config = TableConfig::from_json_str(
            r#"{
                "type": "form",
                "search": {"span": 12, "searchText": "Find"},
                "rowSelection": true,
                "dateFormatter": false,
                "columnEmptyText": false,
                "options": false,
                "size": "small",
                "params": {"tenant": "acme"},
                "columnsStateMap": {"name": {"show": false}, "id": {"fixed": "left"}}
            }"#,
        )
        .unwrap();
        let SearchMode::Form(search) = config.search_mode() else {
            panic!("expected form mode");
        };
        assert!(matches!(search.span, Some(SpanConfig::Fixed(12))));
        assert_eq!(search.texts.search_text.as_deref(), Some("Find"));
        assert!(config.row_selection.is_some());
        assert_eq!(config.date_formatter, DateFormatter::Off);
        assert_eq!(config.column_empty_text, None);
        assert_eq!(config.options, ToolbarOptions::hidden());
        assert_eq!(config.size, Density::Small);
        assert!(!config.columns_state_map["name"].show);
        assert_eq!(config.columns_state_map["id"].fixed, Some(FixedSide::Left));
        assert!(config.columns_state_map["id"].show);
    }

    #[test]
    fn test_disabled_search() {
        let config = TableConfig::from_json_str(r#"{"search": false, "dateFormatter": "number"}"#).unwrap();
        assert!(matches!(config.search_mode(), SearchMode::Disabled));
        assert_eq!(config.date_formatter, DateFormatter::Number);
    }

    #[test]
    fn test_invalid_debounce() {
        assert!(TableConfig::from_json_str(r#"{"debounceMs": 120000}"#).is_err());
        assert!(TableConfig::from_json_str(r#"{"pagination": "yes"}"#).is_err());
    }
}
