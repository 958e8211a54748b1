//! Fetch configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::QueryParams;
use crate::error::FetchError;
use crate::model::Record;

/// Callback receiving the rows of each successful fetch.
///
/// Soft failures (`success: false`), hard failures and discarded stale
/// responses do not call it.
pub type OnLoad = Arc<dyn Fn(&[Record]) + Send + Sync>;

/// Callback receiving hard fetch failures.
pub type OnRequestError = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// Configuration for a [`FetchData`](super::FetchData).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use protable_lib::fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .with_page_size(50)
///     .with_debounce(Duration::from_millis(100))
///     .on_load(|rows| println!("loaded {} rows", rows.len()));
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// First page number.
    ///
    /// Default: 1
    pub default_current: usize,

    /// Rows per page.
    ///
    /// Default: 20
    pub default_page_size: usize,

    /// Window in which re-fetch triggers coalesce.
    ///
    /// Default: 200 ms
    pub debounce: Duration,

    /// Rows shown before the first fetch completes.
    pub default_data: Vec<Record>,

    /// Query parameters of the mount fetch.
    pub params: QueryParams,

    /// Longest a single fetch may take before it fails with
    /// [`FetchError::Timeout`].
    ///
    /// Default: none
    pub timeout: Option<Duration>,

    /// Runs after successful fetches only, with the rows that fetch returned.
    pub on_load: Option<OnLoad>,
    pub on_request_error: Option<OnRequestError>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            default_current: 1,
            default_page_size: 20,
            debounce: Duration::from_millis(200),
            default_data: Vec::new(),
            params: QueryParams::new(),
            timeout: None,
            on_load: None,
            on_request_error: None,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(mut self, current: usize) -> Self {
        self.default_current = current.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_default_data(mut self, rows: Vec<Record>) -> Self {
        self.default_data = rows;
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the callback for successful fetches; see [`OnLoad`].
    pub fn on_load<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Record]) + Send + Sync + 'static,
    {
        self.on_load = Some(Arc::new(f));
        self
    }

    pub fn on_request_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.on_request_error = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("default_current", &self.default_current)
            .field("default_page_size", &self.default_page_size)
            .field("debounce", &self.debounce)
            .field("default_data", &self.default_data.len())
            .field("params", &self.params)
            .field("timeout", &self.timeout)
            .field("on_load", &self.on_load.is_some())
            .field("on_request_error", &self.on_request_error.is_some())
            .finish()
    }
}
