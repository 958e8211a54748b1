//! Integration tests for the cell formatting pipeline.

use protable_lib::model::Column;
use protable_lib::model::ColumnSpec;
use protable_lib::model::ColumnValueType;
use protable_lib::model::MoneyLocale;
use protable_lib::model::ProgressStatus;
use protable_lib::model::Record;
use protable_lib::model::ResolvedValueType;
use protable_lib::model::StatusType;
use protable_lib::model::Value;
use protable_lib::model::ValueType;
use protable_lib::model::ValueTypeDescriptor;
use protable_lib::model::progress_status;
use protable_lib::render::Cell;
use protable_lib::render::render_cell;
use protable_lib::render::render_text;

const COLUMNS: &str = r##"[
    {"title": "#", "valueType": "indexBorder"},
    {"title": "Name", "dataIndex": "name", "copyable": true, "ellipsis": true},
    {"title": "State", "dataIndex": "state", "valueEnum": {
        "all": "All",
        "running": {"text": "Running", "status": "Processing"},
        "done": {"text": "Done", "status": "Success"},
        "draft": "Draft"
    }},
    {"title": "Owner", "dataIndex": ["owner", "name"]},
    {"title": "Budget", "dataIndex": "budget", "valueType": {"type": "money", "locale": "en_US"}},
    {"title": "Progress", "dataIndex": "progress", "valueType": "progress"},
    {"title": "Updated", "dataIndex": "updated", "valueType": "dateTime"}
]"##;

fn row() -> Record {
    Record::from_json(serde_json::json!({
        "name": "Migration",
        "state": "running",
        "owner": {"name": "Kim"},
        "budget": 1234.5,
        "progress": 100,
        "updated": 1709680200000i64,
    }))
    .unwrap()
}

fn cells(row: &Record, index: usize) -> Vec<Cell> {
    ColumnSpec::list_from_json_str(COLUMNS)
        .unwrap()
        .iter()
        .map(|column| render_cell(column, row, index, Some("-")).cell)
        .collect()
}

#[test]
fn test_progress_status_derivation() {
    assert_eq!(progress_status(None), ProgressStatus::Exception);
    assert_eq!(progress_status(Some(-1.0)), ProgressStatus::Exception);
    assert_eq!(progress_status(Some(f64::NAN)), ProgressStatus::Exception);
    assert_eq!(progress_status(Some(0.0)), ProgressStatus::Active);
    assert_eq!(progress_status(Some(99.9)), ProgressStatus::Active);
    assert_eq!(progress_status(Some(100.0)), ProgressStatus::Success);
    assert_eq!(progress_status(Some(120.0)), ProgressStatus::Normal);
}

#[test]
fn test_row_from_json_specs() {
    let cells = cells(&row(), 3);
    assert_eq!(
        cells[0],
        Cell::Index {
            rank: 4,
            bordered: true,
            top_three: true
        }
    );
    assert_eq!(cells[1], Cell::text("Migration"));
    assert_eq!(
        cells[2],
        Cell::Status {
            text: "Running".into(),
            status: StatusType::Processing
        }
    );
    assert_eq!(cells[3], Cell::text("Kim"));
    assert_eq!(cells[4], Cell::Money("$1,234.50".into()));
    assert_eq!(
        cells[5],
        Cell::Progress {
            percent: Some(100.0),
            status: ProgressStatus::Success
        }
    );
    assert_eq!(cells[6], Cell::text("2024-03-05 23:10:00"));
}

#[test]
fn test_missing_values_use_placeholder() {
    let cells = cells(&Record::new().set("state", "draft"), 0);
    assert_eq!(cells[1], Cell::text("-"));
    assert_eq!(cells[2], Cell::text("Draft"));
    assert_eq!(cells[3], Cell::text("-"));
    assert_eq!(cells[6], Cell::text("-"));
    assert_eq!(
        cells[5],
        Cell::Progress {
            percent: None,
            status: ProgressStatus::Exception
        }
    );
}

#[test]
fn test_copy_text_uses_plain_label() {
    let column = Column::new("State")
        .with_data_path("state")
        .with_value_enum(
            protable_lib::model::ValueEnum::new().with_status("done", "Done", StatusType::Success),
        )
        .copyable();
    let output = render_cell(&column, &Record::new().set("state", "done"), 0, Some("-"));
    assert_eq!(output.copy_text.as_deref(), Some("Done"));
    assert!(output.copyable);
    assert!(matches!(output.cell, Cell::Status { .. }));
}

#[test]
fn test_render_hooks() {
    let column = Column::new("Name")
        .with_data_path("name")
        .with_render_text(|value, _, _| Value::from(value.to_string().to_uppercase()))
        .with_render(|cell, row, _| match row.get("url") {
            Some(url) => Cell::link(cell.plain_text(), url.to_string()),
            None => cell,
        });
    let row = Record::new().set("name", "docs").set("url", "https://example.com");
    assert_eq!(
        render_cell(&column, &row, 0, None).cell,
        Cell::link("DOCS", "https://example.com")
    );
}

#[test]
fn test_resolver_per_row() {
    let value_type = ColumnValueType::resolver(|row| {
        if row.get("kind") == Some(&Value::from("ratio")) {
            ResolvedValueType::Descriptor(ValueTypeDescriptor::percent().with_show_symbol(true).with_precision(1))
        } else {
            ResolvedValueType::Descriptor(ValueTypeDescriptor::money().with_locale(MoneyLocale::RuRu))
        }
    });
    let ratio = Record::new().set("kind", "ratio");
    let amount = Record::new().set("kind", "amount");

    assert_eq!(
        render_text(&Value::from(-12.34), &value_type, 0, Some(&ratio), None).plain_text(),
        "-12.3%"
    );
    assert_eq!(
        render_text(&Value::from(1234.5), &value_type, 0, Some(&amount), None),
        Cell::Money("1\u{a0}234,50\u{a0}₽".into())
    );
    assert_eq!(
        render_text(&Value::from("x"), &value_type, 0, None, Some("-")),
        Cell::text("x")
    );
    assert_eq!(
        render_text(&Value::from(""), &ColumnValueType::Tag(ValueType::Code), 0, None, Some("-")),
        Cell::text("-")
    );
}
