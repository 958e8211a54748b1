//! Search fields derived from columns.

use super::FieldRule;
use crate::intl::Intl;
use crate::model::Column;
use crate::model::EnumOption;
use crate::model::Value;
use crate::model::ValueEnum;
use crate::model::ValueType;

/// Input widget a host should render for a search field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWidget {
    Input { placeholder: String },
    Select { options: Vec<EnumOption>, placeholder: String },
    DatePicker { show_time: bool, placeholder: String },
    RangePicker { show_time: bool, placeholders: [String; 2] },
    TimePicker { placeholder: String },
    Number { placeholder: String },
    /// Currency input, non-negative with two fraction digits.
    Money { min: f64, precision: u32, placeholder: String },
    TextArea { placeholder: String },
    /// Host-defined widget, identified by name.
    Custom { name: String },
}

impl FieldWidget {
    /// Picks the widget for a column.
    pub fn for_column(column: &Column, is_form: bool, intl: &dyn Intl) -> Self {
        if let Some(widget) = &column.widget {
            return widget.clone();
        }
        let input = || intl.get_message("tableForm.inputPlaceholder", "please enter");
        let select = || intl.get_message("tableForm.selectPlaceholder", "please select");

        match column.value_type.static_tag() {
            ValueType::Text => match &column.value_enum {
                Some(value_enum) => FieldWidget::Select {
                    options: value_enum.options(),
                    placeholder: select(),
                },
                None => FieldWidget::Input { placeholder: input() },
            },
            ValueType::Date => FieldWidget::DatePicker {
                show_time: false,
                placeholder: select(),
            },
            ValueType::DateTime => FieldWidget::DatePicker {
                show_time: true,
                placeholder: select(),
            },
            ValueType::DateRange => FieldWidget::RangePicker {
                show_time: false,
                placeholders: [select(), select()],
            },
            ValueType::DateTimeRange => FieldWidget::RangePicker {
                show_time: true,
                placeholders: [select(), select()],
            },
            ValueType::Time => FieldWidget::TimePicker { placeholder: select() },
            ValueType::Digit => FieldWidget::Number { placeholder: input() },
            ValueType::Money => FieldWidget::Money {
                min: 0.0,
                precision: 2,
                placeholder: input(),
            },
            ValueType::Textarea if is_form => FieldWidget::TextArea { placeholder: input() },
            _ => FieldWidget::Input { placeholder: input() },
        }
    }
}

/// One input of the search form.
#[derive(Debug, Clone)]
pub struct SearchField {
    /// Column key; also the name of the submitted parameter.
    pub key: String,
    pub label: String,
    /// Value type tag outside of any row.
    pub value_type: ValueType,
    pub widget: FieldWidget,
    pub order: i32,
    pub initial_value: Option<Value>,
    pub value_enum: Option<ValueEnum>,
    pub rules: Vec<FieldRule>,
}

impl SearchField {
    /// Builds the field for a column, or `None` if the column does not take
    /// part in the form.
    ///
    /// Columns hidden for the mode, columns without a key or data path and
    /// presentational columns are skipped.
    pub fn from_column(column: &Column, index: usize, is_form: bool, intl: &dyn Intl) -> Option<Self> {
        let hidden = if is_form {
            column.hide_in_form
        } else {
            column.hide_in_search
        };
        let value_type = column.value_type.static_tag();
        if hidden || value_type.is_presentational() {
            return None;
        }
        column.explicit_key()?;

        Some(Self {
            key: column.column_key(index),
            label: column.label().to_string(),
            value_type,
            widget: FieldWidget::for_column(column, is_form, intl),
            order: column.order.unwrap_or(0),
            initial_value: column.initial_value.clone(),
            value_enum: column.value_enum.clone(),
            rules: column.form_item_props.rules.clone(),
        })
    }
}

/// Derives the ordered field list: descending `order`, ties in column order.
pub fn derive_fields(columns: &[Column], is_form: bool, intl: &dyn Intl) -> Vec<SearchField> {
    let mut fields: Vec<SearchField> = columns
        .iter()
        .enumerate()
        .filter_map(|(index, column)| SearchField::from_column(column, index, is_form, intl))
        .collect();
    fields.sort_by(|a, b| b.order.cmp(&a.order));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intl::IntlMap;

    #[test]
    fn test_field_inclusion() {
        let intl = IntlMap::en_us();
        let columns = vec![
            Column::new("#").with_value_type(ValueType::Index).with_key("index"),
            Column::new("Name").with_data_path("name"),
            Column::new("Hidden").with_data_path("hidden").hide_in_search(),
            Column::new("Keyless"),
            Column::new("Notes").with_data_path("notes").hide_in_form(),
            Column::new("Actions").with_value_type(ValueType::Option).with_key("actions"),
        ];
        let bar: Vec<String> = derive_fields(&columns, false, &intl).into_iter().map(|f| f.key).collect();
        assert_eq!(bar, vec!["name", "notes"]);
        let form: Vec<String> = derive_fields(&columns, true, &intl).into_iter().map(|f| f.key).collect();
        assert_eq!(form, vec!["name", "hidden"]);
    }

    #[test]
    fn test_order_is_stable_descending() {
        let intl = IntlMap::en_us();
        let columns = vec![
            Column::new("a").with_key("a"),
            Column::new("b").with_key("b").with_order(2),
            Column::new("c").with_key("c"),
            Column::new("d").with_key("d").with_order(2),
            Column::new("e").with_key("e").with_order(-1),
        ];
        let keys: Vec<String> = derive_fields(&columns, false, &intl).into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_widgets() {
        let intl = IntlMap::en_us();
        let select = Column::new("s").with_key("s").with_value_enum(ValueEnum::new().with("all", "All"));
        assert!(matches!(
            FieldWidget::for_column(&select, false, &intl),
            FieldWidget::Select { ref options, .. } if options.len() == 1
        ));
        let range = Column::new("r").with_value_type(ValueType::DateTimeRange);
        assert!(matches!(
            FieldWidget::for_column(&range, false, &intl),
            FieldWidget::RangePicker { show_time: true, .. }
        ));
        let notes = Column::new("n").with_value_type(ValueType::Textarea);
        assert!(matches!(FieldWidget::for_column(&notes, false, &intl), FieldWidget::Input { .. }));
        assert!(matches!(FieldWidget::for_column(&notes, true, &intl), FieldWidget::TextArea { .. }));
        let money = Column::new("m").with_value_type(ValueType::Money);
        assert_eq!(
            FieldWidget::for_column(&money, false, &intl),
            FieldWidget::Money {
                min: 0.0,
                precision: 2,
                placeholder: "Please enter".into()
            }
        );
    }
}
