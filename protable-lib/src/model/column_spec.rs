//! Serializable column declarations

use serde::Deserialize;

use super::Column;
use super::DataPath;
use super::FixedSide;
use super::ResolvedValueType;
use super::Value;
use super::ValueEnum;
use crate::error::ConfigError;
use crate::search::FieldRule;

/// Validation options of a [`ColumnSpec`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormItemSpec {
    pub label: Option<String>,
    pub required: bool,
    pub message: Option<String>,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// Column declaration loaded from JSON.
///
/// Mirrors [`Column`] without closures. Field names are camelCase, and the
/// data path may be given as `dataIndex` or `dataPath`.
///
/// ```
/// use protable_lib::model::ColumnSpec;
///
/// let columns = ColumnSpec::list_from_json_str(r#"[
///     {"title": "Name", "dataIndex": "name", "copyable": true},
///     {"title": "Amount", "dataIndex": "amount", "valueType": "money", "hideInSearch": true}
/// ]"#).unwrap();
/// assert_eq!(columns.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSpec {
    pub title: String,
    pub key: Option<String>,
    #[serde(alias = "dataPath")]
    pub data_index: Option<DataPath>,
    pub value_type: Option<ResolvedValueType>,
    pub value_enum: Option<ValueEnum>,
    pub hide_in_table: bool,
    pub hide_in_search: bool,
    pub hide_in_form: bool,
    pub order: Option<i32>,
    pub initial_value: Option<Value>,
    pub form_item_props: FormItemSpec,
    pub fixed: Option<FixedSide>,
    pub width: Option<u32>,
    pub ellipsis: bool,
    pub copyable: bool,
    pub children: Vec<ColumnSpec>,
}

impl ColumnSpec {
    /// Parses a JSON array of column specs into columns.
    pub fn list_from_json_str(json: &str) -> Result<Vec<Column>, ConfigError> {
        let specs: Vec<ColumnSpec> = serde_json::from_str(json)?;
        specs.into_iter().map(Column::try_from).collect()
    }

    fn rules(&self) -> Result<Vec<FieldRule>, ConfigError> {
        let props = &self.form_item_props;
        let message = |fallback: String| props.message.clone().unwrap_or(fallback);
        let mut rules = Vec::new();

        if props.required {
            rules.push(FieldRule::required(message(format!("{} is required", self.title))));
        }
        if let Some(min) = props.min_length {
            rules.push(FieldRule::min_length(
                min,
                message(format!("{} must be at least {min} characters", self.title)),
            ));
        }
        if let Some(max) = props.max_length {
            rules.push(FieldRule::max_length(
                max,
                message(format!("{} must be at most {max} characters", self.title)),
            ));
        }
        if let Some(pattern) = &props.pattern {
            let rule = FieldRule::pattern(pattern, message(format!("{} is invalid", self.title))).map_err(
                |source| ConfigError::InvalidPattern {
                    column: self.title.clone(),
                    pattern: pattern.clone(),
                    source,
                },
            )?;
            rules.push(rule);
        }
        Ok(rules)
    }
}

impl TryFrom<ColumnSpec> for Column {
    type Error = ConfigError;

    fn try_from(spec: ColumnSpec) -> Result<Self, Self::Error> {
        let rules = spec.rules()?;
        let children = spec
            .children
            .into_iter()
            .map(Column::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut column = Column::new(spec.title);
        column.key = spec.key;
        column.data_path = spec.data_index;
        if let Some(value_type) = spec.value_type {
            column.value_type = value_type.into();
        }
        column.value_enum = spec.value_enum;
        column.hide_in_table = spec.hide_in_table;
        column.hide_in_search = spec.hide_in_search;
        column.hide_in_form = spec.hide_in_form;
        column.order = spec.order;
        column.initial_value = spec.initial_value;
        column.form_item_props.label = spec.form_item_props.label;
        column.form_item_props.rules = rules;
        column.fixed = spec.fixed;
        column.width = spec.width;
        column.ellipsis = spec.ellipsis;
        column.copyable = spec.copyable;
        column.children = children;
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnValueType;
    use crate::model::ValueType;

    #[test]
    fn test_full_spec() {
        let columns = ColumnSpec::list_from_json_str(
            r#"[{
                "title": "Code",
                "dataIndex": ["meta", "code"],
                "valueType": "dateRange",
                "order": 2,
                "fixed": "left",
                "formItemProps": {"required": true, "pattern": "^[A-Z]+$"},
                "children": [{"title": "Child", "key": "child"}]
            }]"#,
        )
        .unwrap();
        let column = &columns[0];
        assert_eq!(column.column_key(0), "meta-code");
        assert!(matches!(column.value_type, ColumnValueType::Tag(ValueType::DateRange)));
        assert_eq!(column.order, Some(2));
        assert_eq!(column.fixed, Some(FixedSide::Left));
        assert_eq!(column.form_item_props.rules.len(), 2);
        assert_eq!(column.children[0].column_key(0), "child");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ColumnSpec::list_from_json_str(
            r#"[{"title": "Bad", "formItemProps": {"pattern": "("}}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
