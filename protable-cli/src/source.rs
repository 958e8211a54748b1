//! In-process data source over rows loaded from a file.

use std::sync::Arc;

use protable_lib::error::FetchError;
use protable_lib::fetch::DataSource;
use protable_lib::fetch::FetchParams;
use protable_lib::fetch::FnSource;
use protable_lib::fetch::RequestData;
use protable_lib::model::DataPath;
use protable_lib::model::Record;
use protable_lib::model::Value;

/// Serves rows the way a backend would: filtered by the query, one page at
/// a time.
pub fn local_source(rows: Vec<Record>) -> impl DataSource {
    let rows = Arc::new(rows);
    FnSource::new(move |params: FetchParams| {
        let rows = Arc::clone(&rows);
        async move { Ok::<_, FetchError>(serve(&rows, &params)) }
    })
}

fn serve(rows: &[Record], params: &FetchParams) -> RequestData {
    let matching: Vec<&Record> = rows
        .iter()
        .filter(|row| {
            params
                .query
                .iter()
                .all(|(key, wanted)| matches(row.get_path(&DataPath::from(key.as_str())), wanted))
        })
        .collect();
    let start = params.current.saturating_sub(1) * params.page_size;
    let data = matching
        .iter()
        .skip(start)
        .take(params.page_size)
        .map(|row| (*row).clone())
        .collect();
    log::debug!("Serving page {} of {} matching rows", params.current, matching.len());
    RequestData::new(data, matching.len())
}

/// Strings match as case-insensitive substrings, two-element lists as an
/// inclusive range; anything else by its text.
fn matches(actual: Option<&Value>, wanted: &Value) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let text = actual.to_string();
    match wanted {
        Value::String(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
        Value::List(bounds) if bounds.len() == 2 => {
            let (low, high) = (bounds[0].to_string(), bounds[1].to_string());
            let day = text.get(..low.len().min(text.len())).unwrap_or(&text);
            day >= low.as_str() && day <= high.as_str()
        }
        other => text == other.to_string(),
    }
}
