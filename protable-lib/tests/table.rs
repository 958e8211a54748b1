//! Integration tests for the table orchestrator.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use protable_lib::error::SearchError;
use protable_lib::fetch::DataSource;
use protable_lib::fetch::FetchParams;
use protable_lib::fetch::FnSource;
use protable_lib::fetch::QueryParams;
use protable_lib::fetch::RequestData;
use protable_lib::model::Column;
use protable_lib::model::FixedSide;
use protable_lib::model::Record;
use protable_lib::model::Value;
use protable_lib::model::ValueEnum;
use protable_lib::model::ValueType;
use protable_lib::render::Cell;
use protable_lib::table::ActionHandle;
use protable_lib::table::Density;
use protable_lib::table::Pagination;
use protable_lib::table::PaginationConfig;
use protable_lib::table::ProTable;
use protable_lib::table::SelectionConfig;
use protable_lib::table::TableConfig;
use protable_lib::table::TableType;
use protable_lib::table::ToolbarAction;

type Calls = Arc<Mutex<Vec<FetchParams>>>;

fn columns() -> Vec<Column> {
    vec![
        Column::new("#").with_value_type(ValueType::Index),
        Column::new("Name").with_data_path("name"),
        Column::new("Status")
            .with_data_path("status")
            .with_value_enum(ValueEnum::new().with("all", "All").with("open", "Open"))
            .with_initial_value("all"),
        Column::new("Id").with_key("key").with_data_path("key").with_fixed(FixedSide::Right),
    ]
}

fn local_rows(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .set("key", format!("k{i}"))
                .set("name", format!("row {i}"))
                .set("status", "open")
        })
        .collect()
}

/// Server with 57 rows that records every request.
fn server(calls: Calls) -> impl DataSource {
    FnSource::new(move |params: FetchParams| {
        let calls = Arc::clone(&calls);
        async move {
            calls.lock().unwrap().push(params.clone());
            let start = (params.current - 1) * params.page_size;
            let end = (start + params.page_size).min(57);
            let data = (start..end)
                .map(|i| Record::new().set("key", format!("k{i}")).set("name", format!("row {i}")))
                .collect();
            Ok(RequestData::new(data, 57))
        }
    })
}

fn last_query(calls: &Calls) -> QueryParams {
    calls.lock().unwrap().last().unwrap().query.clone()
}

// =============================================================================
// Local data
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_local_rows_page_locally() {
    let table = ProTable::builder(columns()).with_data_source(local_rows(45)).build();
    table.settled().await;

    assert_eq!(table.rows().len(), 45);
    assert_eq!(table.page_rows().len(), 20);

    table.change_page(3, 20);
    table.settled().await;
    let page = table.page_rows();
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].get("name"), Some(&Value::from("row 40")));

    let view = table.pagination().unwrap();
    assert_eq!(view.range, (41, 45));
    assert_eq!(view.total_text, "41-45 of 45 items");

    let rendered = table.render_rows();
    assert_eq!(rendered[0].key, "k40");
    assert_eq!(rendered[0].cells[0].cell.plain_text(), "1");
}

#[tokio::test(start_paused = true)]
async fn test_disabled_pagination_shows_everything() {
    let table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_pagination(Pagination::Disabled))
        .with_data_source(local_rows(45))
        .build();
    table.settled().await;

    assert_eq!(table.page_rows().len(), 45);
    assert!(table.pagination().is_none());
}

// =============================================================================
// Requests and search
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_request_carries_search_and_external_params() {
    let calls = Calls::default();
    let submitted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&submitted);
    let mut params = QueryParams::new();
    params.insert("tenant".into(), Value::from("acme"));

    let mut table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_params(params))
        .with_request(server(Arc::clone(&calls)))
        .before_search_submit(|mut values| {
            values.insert("source".into(), Value::from("bar"));
            values
        })
        .on_submit(move |values| sink.lock().unwrap().push(values.clone()))
        .build();
    table.settled().await;
    assert_eq!(last_query(&calls).get("tenant"), Some(&Value::from("acme")));

    table.change_page(2, 20);
    table.settled().await;
    assert_eq!(calls.lock().unwrap().last().unwrap().current, 2);

    table.search_form_mut().unwrap().set_value("name", "row");
    let values = table.submit_search().unwrap();
    table.settled().await;

    assert!(!values.contains_key("status"));
    let request = calls.lock().unwrap().last().unwrap().clone();
    assert_eq!(request.current, 1);
    assert_eq!(request.get("name"), Some(&Value::from("row")));
    assert_eq!(request.get("source"), Some(&Value::from("bar")));
    assert_eq!(request.get("tenant"), Some(&Value::from("acme")));
    assert_eq!(submitted.lock().unwrap().len(), 1);
    assert!(!submitted.lock().unwrap()[0].contains_key("source"));
}

#[tokio::test(start_paused = true)]
async fn test_resubmit_refetches() {
    let calls = Calls::default();
    let mut table = ProTable::builder(columns())
        .with_request(server(Arc::clone(&calls)))
        .build();
    table.settled().await;

    table.search_form_mut().unwrap().set_value("name", "x");
    table.submit_search().unwrap();
    table.settled().await;
    table.submit_search().unwrap();
    table.settled().await;

    assert_eq!(calls.lock().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_reset_search_clears_params() {
    let calls = Calls::default();
    let resets = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&resets);
    let mut table = ProTable::builder(columns())
        .with_request(server(Arc::clone(&calls)))
        .on_reset(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();
    table.settled().await;

    table.search_form_mut().unwrap().set_value("name", "x");
    table.submit_search().unwrap();
    table.settled().await;
    assert!(last_query(&calls).contains_key("name"));

    table.reset_search();
    table.settled().await;
    assert!(last_query(&calls).is_empty());
    assert_eq!(table.search_form().unwrap().value("name"), None);
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_form_mode_submit_does_not_fetch() {
    let calls = Calls::default();
    let submitted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&submitted);
    let mut table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_type(TableType::Form))
        .with_request(server(Arc::clone(&calls)))
        .on_submit(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();
    table.settled().await;

    table.search_form_mut().unwrap().set_value("name", "x");
    table.submit_search().unwrap();
    table.settled().await;

    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(submitted.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_search() {
    let mut table = ProTable::builder(columns())
        .with_config(TableConfig::default().without_search())
        .build();
    assert!(table.search_form().is_none());
    assert!(matches!(table.submit_search(), Err(SearchError::Disabled)));
}

#[tokio::test(start_paused = true)]
async fn test_post_data_transforms_rows() {
    let calls = Calls::default();
    let table = ProTable::builder(columns())
        .with_request(server(Arc::clone(&calls)))
        .post_data(|rows| rows.into_iter().take(2).collect())
        .build();
    table.settled().await;
    assert_eq!(table.rows().len(), 2);
}

// =============================================================================
// Actions and selection
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_reload_with_page_reset() {
    let calls = Calls::default();
    let table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_row_selection(SelectionConfig::new()))
        .with_request(server(Arc::clone(&calls)))
        .build();
    table.settled().await;
    let action = table.action();

    assert!(action.fetch_more());
    table.settled().await;
    assert_eq!(table.rows().len(), 40);

    table.select_rows(vec!["k1".into(), "k25".into()]);
    assert_eq!(table.selected_rows().len(), 2);
    assert_eq!(table.selection_alert().unwrap().text, "Selected 2 items");

    action.reload(true);
    assert!(table.selected_keys().is_empty());
    table.settled().await;
    assert_eq!(calls.lock().unwrap().last().unwrap().current, 1);
    assert_eq!(calls.lock().unwrap().len(), 3);
    assert_eq!(table.rows().len(), 20);
}

#[tokio::test(start_paused = true)]
async fn test_successful_load_clears_selection() {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let selection = SelectionConfig::new().on_change(move |keys, _| sink.lock().unwrap().push(keys.len()));
    let table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_row_selection(selection))
        .with_data_source(local_rows(5))
        .build();
    table.settled().await;

    table.toggle_row("k3");
    assert_eq!(table.selected_keys(), ["k3"]);
    table.action().reload(false);
    table.settled().await;

    assert!(table.selected_keys().is_empty());
    assert_eq!(changes.lock().unwrap().last(), Some(&0));
    table.action().clear_selected();
    assert!(table.selection_alert().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_selection_callback_can_call_back_into_table() {
    let handle: Arc<OnceLock<ActionHandle>> = Arc::default();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let (callback_handle, sink) = (Arc::clone(&handle), Arc::clone(&changes));
    let selection = SelectionConfig::new().on_change(move |keys, rows| {
        sink.lock().unwrap().push((keys.len(), rows.len()));
        if let (2, Some(action)) = (keys.len(), callback_handle.get()) {
            action.clear_selected();
        }
    });
    let table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_row_selection(selection))
        .with_data_source(local_rows(5))
        .build();
    table.settled().await;
    handle.set(table.action()).unwrap();
    changes.lock().unwrap().clear();

    table.toggle_row("k1");
    assert_eq!(table.selected_keys(), ["k1"]);
    table.toggle_row("k2");

    assert!(table.selected_keys().is_empty());
    assert_eq!(*changes.lock().unwrap(), vec![(1, 1), (2, 2), (0, 0)]);
}

#[tokio::test(start_paused = true)]
async fn test_controlled_pagination_sync() {
    let calls = Calls::default();
    let pages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&pages);
    let pagination = PaginationConfig::new()
        .controlled(2, 10)
        .on_change(move |page, size| sink.lock().unwrap().push((page, size)));
    let table = ProTable::builder(columns())
        .with_config(TableConfig::default().with_pagination(Pagination::Enabled(pagination)))
        .with_request(server(Arc::clone(&calls)))
        .build();
    table.settled().await;
    assert_eq!(calls.lock().unwrap()[0], FetchParams::new(2, 10));

    table.change_page(3, 10);
    table.settled().await;
    assert_eq!(*pages.lock().unwrap(), vec![(3, 10)]);

    table.sync_pagination(1, 25);
    table.settled().await;
    assert_eq!(calls.lock().unwrap().last().unwrap(), &FetchParams::new(1, 25));
}

// =============================================================================
// Columns and toolbar
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_column_settings() {
    let states = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&states);
    let mut table = ProTable::builder(columns())
        .with_data_source(local_rows(3))
        .on_columns_state_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();
    table.settled().await;

    let keys: Vec<_> = table.leaf_columns().iter().map(|c| c.key.clone()).collect();
    assert_eq!(keys, ["0", "name", "status", "key"]);
    assert_eq!(table.render_rows()[0].cells.len(), 4);
    assert_eq!(table.render_rows()[0].cells[2].cell, Cell::text("Open"));

    table.set_column_show("status", false);
    table.set_column_fixed("name", Some(FixedSide::Left));
    let keys: Vec<_> = table.leaf_columns().iter().map(|c| c.key.clone()).collect();
    assert_eq!(keys, ["name", "0", "key"]);
    assert_eq!(table.render_rows()[0].cells.len(), 3);
    assert_eq!(states.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_set_columns_updates_search_form() {
    let mut table = ProTable::builder(columns()).build();
    assert_eq!(table.search_form().unwrap().fields().len(), 3);

    let mut next = columns();
    next.push(Column::new("Owner").with_data_path("owner"));
    table.set_columns(next);
    assert_eq!(table.search_form().unwrap().fields().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_density_and_toolbar() {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    let calls = Calls::default();
    let mut table = ProTable::builder(columns())
        .with_request(server(Arc::clone(&calls)))
        .on_size_change(move |density| sink.lock().unwrap().push(density))
        .build();
    table.settled().await;

    assert_eq!(table.density(), Density::Middle);
    table.set_density(Density::Small);
    assert_eq!(*sizes.lock().unwrap(), vec![Density::Small]);

    let actions: Vec<_> = table.toolbar_actions().into_iter().map(|(a, _)| a).collect();
    assert_eq!(actions[0], ToolbarAction::Reload);
    table.run_toolbar_action(ToolbarAction::Reload);
    table.settled().await;
    assert_eq!(calls.lock().unwrap().len(), 2);
}
