//! Search form state.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::ColConfig;
use super::DateFormatter;
use super::GRID_COLUMNS;
use super::ScreenSize;
use super::SearchConfig;
use super::SearchField;
use super::SpanConfig;
use super::Validator;
use super::convert_values;
use super::derive_fields;
use crate::error::SearchError;
use crate::error::ValidationResult;
use crate::fetch::QueryParams;
use crate::intl::Intl;
use crate::model::Column;
use crate::model::Value;

/// Resolved labels of the form's buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTexts {
    pub search: String,
    pub reset: String,
    pub submit: String,
    /// Label of the collapse toggle in its current state.
    pub toggle: String,
}

/// Fields, values and layout of a search bar or full form.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use protable_lib::intl::IntlMap;
/// use protable_lib::model::{Column, ValueEnum};
/// use protable_lib::search::{SearchConfig, SearchForm};
///
/// let columns = vec![
///     Column::new("Name").with_data_path("name"),
///     Column::new("Status")
///         .with_data_path("status")
///         .with_value_enum(ValueEnum::new().with("all", "All").with("open", "Open"))
///         .with_initial_value("all"),
/// ];
/// let mut form = SearchForm::new(&columns, false, SearchConfig::default(), Arc::new(IntlMap::en_us()));
/// form.set_value("name", "acme");
///
/// let params = form.submit().unwrap();
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Clone)]
pub struct SearchForm {
    fields: Vec<SearchField>,
    values: BTreeMap<String, Value>,
    is_form: bool,
    config: SearchConfig,
    screen: ScreenSize,
    collapsed: bool,
    date_formatter: DateFormatter,
    intl: Arc<dyn Intl>,
}

impl SearchForm {
    /// Derives the form from `columns`; values start at the initial values.
    pub fn new(columns: &[Column], is_form: bool, config: SearchConfig, intl: Arc<dyn Intl>) -> Self {
        let fields = derive_fields(columns, is_form, intl.as_ref());
        let mut form = Self {
            fields,
            values: BTreeMap::new(),
            is_form,
            config,
            screen: ScreenSize::default(),
            collapsed: true,
            date_formatter: DateFormatter::default(),
            intl,
        };
        form.values = form.initial_values();
        form
    }

    pub fn with_date_formatter(mut self, formatter: DateFormatter) -> Self {
        self.date_formatter = formatter;
        self
    }

    pub fn with_screen_size(mut self, size: ScreenSize) -> Self {
        self.screen = size;
        self
    }

    /// Re-derives the fields; values of keys that no longer exist are dropped.
    pub fn set_columns(&mut self, columns: &[Column]) {
        self.fields = derive_fields(columns, self.is_form, self.intl.as_ref());
        let fields = &self.fields;
        self.values.retain(|key, _| fields.iter().any(|f| &f.key == key));
    }

    pub fn set_screen_size(&mut self, size: ScreenSize) {
        self.screen = size;
    }

    pub fn set_date_formatter(&mut self, formatter: DateFormatter) {
        self.date_formatter = formatter;
    }

    pub fn is_form(&self) -> bool {
        self.is_form
    }

    pub fn date_formatter(&self) -> DateFormatter {
        self.date_formatter
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    /// Grid span of each field at the current screen size.
    pub fn span(&self) -> u32 {
        let default = if self.is_form {
            SpanConfig::Responsive(ColConfig::full_width())
        } else {
            SpanConfig::Responsive(ColConfig::default())
        };
        self.config.span.unwrap_or(default).span(self.screen)
    }

    /// Fields shown while collapsed: one grid row minus the option column.
    pub fn collapsed_capacity(&self) -> usize {
        let per_row = GRID_COLUMNS.div_ceil(self.span()) as usize;
        per_row.saturating_sub(1).max(1)
    }

    pub fn is_collapsed(&self) -> bool {
        !self.is_form && self.config.collapsed.unwrap_or(self.collapsed)
    }

    /// Sets the collapsed state and notifies `on_collapse`.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
        if let Some(on_collapse) = &self.config.on_collapse {
            on_collapse(collapsed);
        }
    }

    pub fn toggle_collapsed(&mut self) {
        self.set_collapsed(!self.is_collapsed());
    }

    /// Fields currently on screen.
    pub fn visible_fields(&self) -> &[SearchField] {
        if self.is_collapsed() {
            let shown = self.collapsed_capacity().min(self.fields.len());
            &self.fields[..shown]
        } else {
            &self.fields
        }
    }

    pub fn show_collapse_button(&self) -> bool {
        !self.is_form && self.fields.len() > self.collapsed_capacity()
    }

    /// Grid offset placing the option column at the end of the last row.
    pub fn option_offset(&self) -> u32 {
        let span = self.span();
        let cols = (GRID_COLUMNS / span).max(1);
        let used = self.visible_fields().len() as u32 % cols;
        (cols - 1 - used) * span
    }

    pub fn texts(&self) -> FormTexts {
        let texts = &self.config.texts;
        let message = |configured: &Option<String>, key: &str, fallback: &str| {
            configured
                .clone()
                .unwrap_or_else(|| self.intl.get_message(key, fallback))
        };
        let toggle = if self.is_collapsed() {
            message(&texts.collapsed_text, "tableForm.collapsed", "Expand")
        } else {
            message(&texts.expanded_text, "tableForm.expand", "Collapse")
        };
        FormTexts {
            search: message(&texts.search_text, "tableForm.search", "Query"),
            reset: message(&texts.reset_text, "tableForm.reset", "Reset"),
            submit: message(&texts.submit_text, "tableForm.submit", "Submit"),
            toggle,
        }
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Truthy initial values of all fields.
    pub fn initial_values(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .filter_map(|field| {
                field
                    .initial_value
                    .as_ref()
                    .filter(|value| value.is_truthy())
                    .map(|value| (field.key.clone(), value.clone()))
            })
            .collect()
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn clear_value(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Restores the initial values.
    pub fn reset(&mut self) {
        self.values = self.initial_values();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Checks field rules. Only full forms validate.
    pub fn validate(&self) -> ValidationResult {
        if !self.is_form {
            return ValidationResult::Valid;
        }
        self.fields
            .iter()
            .fold(Validator::new(), |validator, field| {
                validator.field(&field.key, self.values.get(&field.key), &field.rules)
            })
            .validate()
    }

    /// Produces the normalized parameters, or the validation errors.
    pub fn submit(&self) -> Result<QueryParams, SearchError> {
        if let ValidationResult::Invalid(errors) = self.validate() {
            return Err(SearchError::Validation(errors));
        }
        Ok(convert_values(&self.values, &self.fields, self.date_formatter))
    }
}
