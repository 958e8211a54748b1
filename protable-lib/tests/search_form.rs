//! Integration tests for search-form derivation and value normalization.

use std::sync::Arc;

use chrono::TimeZone;
use chrono::Utc;
use protable_lib::intl::IntlMap;
use protable_lib::model::Column;
use protable_lib::model::Value;
use protable_lib::model::ValueEnum;
use protable_lib::model::ValueType;
use protable_lib::search::DateFormatter;
use protable_lib::search::FieldRule;
use protable_lib::search::FieldWidget;
use protable_lib::search::ScreenSize;
use protable_lib::search::SearchConfig;
use protable_lib::search::SearchForm;

fn status_enum() -> ValueEnum {
    ValueEnum::new()
        .with("all", "All")
        .with("open", "Open")
        .with("closed", "Closed")
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("#").with_value_type(ValueType::IndexBorder),
        Column::new("Title").with_data_path("title"),
        Column::new("Status")
            .with_data_path("status")
            .with_value_enum(status_enum())
            .with_initial_value("all")
            .with_order(2),
        Column::new("Created").with_data_path("created").with_value_type(ValueType::DateTime),
        Column::new("Window")
            .with_data_path("window")
            .with_value_type(ValueType::DateRange),
        Column::new("Notes")
            .with_data_path("notes")
            .with_value_type(ValueType::Textarea)
            .hide_in_search(),
        Column::new("Actions").with_value_type(ValueType::Option),
    ]
}

fn bar(formatter: DateFormatter) -> SearchForm {
    SearchForm::new(&columns(), false, SearchConfig::default(), Arc::new(IntlMap::en_us()))
        .with_date_formatter(formatter)
}

#[test]
fn test_field_derivation() {
    let form = bar(DateFormatter::String);
    let keys: Vec<_> = form.fields().iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, ["status", "title", "created", "window"]);

    assert!(matches!(&form.fields()[0].widget, FieldWidget::Select { options, .. } if options.len() == 3));
    assert!(matches!(form.fields()[2].widget, FieldWidget::DatePicker { show_time: true, .. }));
    assert!(matches!(form.fields()[3].widget, FieldWidget::RangePicker { show_time: false, .. }));

    let full = SearchForm::new(&columns(), true, SearchConfig::default(), Arc::new(IntlMap::en_us()));
    assert!(full.fields().iter().any(|f| f.key == "notes"));
}

#[test]
fn test_all_sentinel_is_stripped() {
    let form = bar(DateFormatter::String);
    assert_eq!(form.value("status"), Some(&Value::from("all")));

    let params = form.submit().unwrap();
    assert!(!params.contains_key("status"));

    let mut form = form;
    form.set_value("status", "open");
    assert_eq!(form.submit().unwrap().get("status"), Some(&Value::from("open")));
}

#[test]
fn test_date_string_round_trip() {
    let mut form = bar(DateFormatter::String);
    form.set_value("created", "2024-03-05 23:10:00");
    form.set_value("window", Value::List(vec!["2024-03-01".into(), "2024-03-31".into()]));

    let params = form.submit().unwrap();
    assert_eq!(params.get("created"), Some(&Value::from("2024-03-05 23:10:00")));
    assert_eq!(
        params.get("window"),
        Some(&Value::List(vec!["2024-03-01".into(), "2024-03-31".into()]))
    );
}

#[test]
fn test_date_number_and_off() {
    let instant = Utc.with_ymd_and_hms(2024, 3, 5, 23, 10, 0).unwrap();

    let mut numeric = bar(DateFormatter::Number);
    numeric.set_value("created", instant);
    assert_eq!(
        numeric.submit().unwrap().get("created"),
        Some(&Value::Int(1_709_680_200_000))
    );

    let mut raw = bar(DateFormatter::Off);
    raw.set_value("created", instant);
    assert_eq!(raw.submit().unwrap().get("created"), Some(&Value::DateTime(instant)));
}

#[test]
fn test_null_values_and_reset() {
    let mut form = bar(DateFormatter::String);
    form.set_value("title", Value::Null);
    form.set_value("status", "closed");
    assert_eq!(form.submit().unwrap().len(), 1);

    form.reset();
    assert_eq!(form.value("status"), Some(&Value::from("all")));
    assert!(form.submit().unwrap().is_empty());
}

#[test]
fn test_collapse_by_screen_size() {
    let mut form = bar(DateFormatter::String);
    assert_eq!(form.visible_fields().len(), 2);
    assert!(form.show_collapse_button());

    form.set_screen_size(ScreenSize::Xs);
    assert_eq!(form.span(), 24);
    assert_eq!(form.visible_fields().len(), 1);

    form.set_screen_size(ScreenSize::Xxl);
    assert_eq!(form.visible_fields().len(), 3);
    assert_eq!(form.option_offset(), 0);
    form.toggle_collapsed();
    assert_eq!(form.visible_fields().len(), 4);
    assert_eq!(form.option_offset(), 18);
}

#[test]
fn test_form_mode_validation() {
    let columns = vec![
        Column::new("Email")
            .with_data_path("email")
            .with_rule(FieldRule::required("Email is required"))
            .with_rule(FieldRule::pattern(r"^[^@]+@[^@]+$", "Not an email").unwrap()),
        Column::new("Name")
            .with_data_path("name")
            .with_rule(FieldRule::min_length(2, "Too short")),
    ];
    let mut form = SearchForm::new(&columns, true, SearchConfig::default(), Arc::new(IntlMap::en_us()));

    let errors = form.submit().unwrap_err();
    assert_eq!(errors.field_errors().len(), 1);
    assert_eq!(errors.field_errors()[0].field, "email");

    form.set_value("email", "nope");
    form.set_value("name", "x");
    let errors = form.submit().unwrap_err();
    let messages: Vec<_> = errors.field_errors().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["Not an email", "Too short"]);

    form.set_value("email", "a@b.c");
    form.set_value("name", "Ann");
    assert_eq!(form.submit().unwrap().len(), 2);
}

#[test]
fn test_localized_texts() {
    let form = SearchForm::new(&columns(), false, SearchConfig::default(), Arc::new(IntlMap::zh_cn()));
    let texts = form.texts();
    assert_eq!(texts.search, "查询");
    assert_eq!(texts.toggle, "展开");
}
