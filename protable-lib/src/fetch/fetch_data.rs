//! Paged fetch state machine.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::Weak;

use futures::FutureExt;
use tokio::sync::watch;

use super::DataSource;
use super::Debouncer;
use super::FetchMode;
use super::FetchOptions;
use super::FetchParams;
use super::FetchSnapshot;
use super::PageInfo;
use super::PageInfoPatch;
use super::QueryParams;
use crate::error::FetchError;
use crate::model::Record;

/// Owner of paged list state.
///
/// Every re-fetch trigger (mount, [`reload`](Self::reload), param, page or
/// page-size changes) goes through one debounce queue, so a burst of triggers
/// produces a single fetch carrying the latest state. While a fetch is in
/// flight, new fetch starts are dropped rather than queued.
///
/// Cheap to clone; clones share state. When the last clone is dropped the
/// pending trigger is cancelled and the background task exits.
///
/// # Example
///
/// ```
/// use protable_lib::fetch::{FetchData, FetchOptions, StaticSource};
/// use protable_lib::model::Record;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let rows = vec![Record::new().set("name", "a"), Record::new().set("name", "b")];
/// let fetch = FetchData::new(StaticSource::new(rows), FetchOptions::default());
///
/// fetch.settled().await;
/// assert_eq!(fetch.rows().len(), 2);
/// # }
/// ```
#[derive(Clone)]
pub struct FetchData {
    inner: Arc<FetchInner>,
}

struct FetchInner {
    source: Arc<dyn DataSource>,
    state: Mutex<FetchState>,
    debouncer: Debouncer<FetchMode>,
    options: FetchOptions,
    snapshots: watch::Sender<FetchSnapshot>,
}

struct FetchState {
    page_info: PageInfo,
    rows: Vec<Record>,
    loading: Option<bool>,
    params: QueryParams,
    /// Bumped whenever in-flight responses become stale.
    generation: u64,
    /// A trigger arrived while the current fetch was in flight.
    dropped: bool,
}

enum Outcome {
    Loaded(Vec<Record>),
    SoftFailure,
    Failed(FetchError),
    Stale,
}

impl FetchData {
    /// Creates the state machine and schedules the mount fetch.
    ///
    /// # Panics
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(source: impl DataSource + 'static, options: FetchOptions) -> Self {
        Self::from_arc(Arc::new(source), options)
    }

    /// Like [`new`](Self::new), for a shared source.
    pub fn from_arc(source: Arc<dyn DataSource>, options: FetchOptions) -> Self {
        let state = FetchState {
            page_info: PageInfo::initial(options.default_current, options.default_page_size),
            rows: options.default_data.clone(),
            loading: None,
            params: options.params.clone(),
            generation: 0,
            dropped: false,
        };
        let (snapshots, _) = watch::channel(state.snapshot());
        let inner = Arc::new(FetchInner {
            source,
            state: Mutex::new(state),
            debouncer: Debouncer::new(options.debounce),
            options,
            snapshots,
        });

        tokio::spawn(drive(Arc::downgrade(&inner), inner.debouncer.clone()));
        inner.debouncer.trigger(FetchMode::Replace);

        Self { inner }
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Re-fetches the current page, replacing the loaded rows.
    pub fn reload(&self) {
        self.inner.debouncer.trigger(FetchMode::Replace);
    }

    /// Advances to the next page and appends its rows.
    ///
    /// Returns `false` (and does nothing) when there is no further page.
    pub fn fetch_more(&self) -> bool {
        {
            let mut state = self.inner.lock_state();
            if !state.page_info.has_more {
                return false;
            }
            state.page_info.page += 1;
        }
        self.inner.publish();
        self.inner.debouncer.trigger(FetchMode::Append);
        true
    }

    /// Restores page, page size, total and `has_more` to their defaults.
    ///
    /// Does not fetch. A response still in flight is discarded; a reload
    /// requested while it was in flight runs once it lands.
    pub fn reset(&self) {
        {
            let mut state = self.inner.lock_state();
            state.page_info = PageInfo::initial(
                self.inner.options.default_current,
                self.inner.options.default_page_size,
            );
            state.generation += 1;
        }
        self.inner.publish();
    }

    /// Goes back to page 1, keeping the page size.
    pub fn reset_page_index(&self) {
        self.set_page_info(PageInfoPatch::page(1));
    }

    /// Merges a partial page update.
    ///
    /// A new page size resets the page to 1, clears the rows and re-fetches,
    /// also when it arrives during a fetch of the old page size.
    /// A new page alone re-fetches only while the loaded rows fit in one page;
    /// more rows than that means the table pages locally.
    pub fn set_page_info(&self, patch: PageInfoPatch) {
        let refetch = {
            let mut state = self.inner.lock_state();
            if let Some(total) = patch.total {
                state.page_info.total = total;
            }
            match (patch.page_size, patch.page) {
                (Some(size), _) if size > 0 && size != state.page_info.page_size => {
                    state.page_info.page_size = size;
                    state.page_info.page = 1;
                    state.rows.clear();
                    state.generation += 1;
                    true
                }
                (_, Some(page)) if page.max(1) != state.page_info.page => {
                    state.page_info.page = page.max(1);
                    state.rows.len() <= state.page_info.page_size
                }
                _ => false,
            }
        };
        self.inner.publish();
        if refetch {
            self.inner.debouncer.trigger(FetchMode::Replace);
        }
    }

    /// Replaces the query parameters, re-fetching if they changed by value.
    pub fn set_params(&self, params: QueryParams) -> bool {
        {
            let mut state = self.inner.lock_state();
            if state.params == params {
                return false;
            }
            state.params = params;
        }
        self.inner.debouncer.trigger(FetchMode::Replace);
        true
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn snapshot(&self) -> FetchSnapshot {
        self.inner.lock_state().snapshot()
    }

    pub fn page_info(&self) -> PageInfo {
        self.inner.lock_state().page_info
    }

    pub fn rows(&self) -> Vec<Record> {
        self.inner.lock_state().rows.clone()
    }

    pub fn loading(&self) -> Option<bool> {
        self.inner.lock_state().loading
    }

    pub fn params(&self) -> QueryParams {
        self.inner.lock_state().params.clone()
    }

    /// Returns `true` while a trigger waits for its debounce window.
    pub fn is_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Waits until no trigger is pending and no fetch is in flight.
    ///
    /// Returns at once if nothing was ever scheduled.
    pub async fn settled(&self) {
        let mut updates = self.subscribe();
        loop {
            if !self.is_pending() && self.loading() != Some(true) {
                return;
            }
            if updates.changed().await.is_err() {
                return;
            }
        }
    }

    /// Receiver notified after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot> {
        self.inner.snapshots.subscribe()
    }
}

impl std::fmt::Debug for FetchData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("FetchData")
            .field("page_info", &state.page_info)
            .field("rows", &state.rows.len())
            .field("loading", &state.loading)
            .field("params", &state.params)
            .finish()
    }
}

impl FetchState {
    fn snapshot(&self) -> FetchSnapshot {
        FetchSnapshot {
            page_info: self.page_info,
            rows: self.rows.clone(),
            loading: self.loading,
        }
    }
}

impl FetchInner {
    fn lock_state(&self) -> MutexGuard<'_, FetchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let snapshot = self.lock_state().snapshot();
        self.snapshots.send_replace(snapshot);
    }

    /// Raises the loading latch and captures the request, unless a fetch is
    /// already in flight.
    fn begin_fetch(&self, mode: FetchMode) -> Option<(FetchParams, u64)> {
        let started = {
            let mut state = self.lock_state();
            if state.loading == Some(true) {
                log::debug!("Fetch in flight, dropping {mode:?} trigger");
                state.dropped = true;
                return None;
            }
            state.loading = Some(true);
            state.dropped = false;
            let params = FetchParams::new(state.page_info.page, state.page_info.page_size)
                .with_query(state.params.clone());
            (params, state.generation)
        };
        self.publish();
        log::debug!(
            "Fetching page {} (size {}, {mode:?})",
            started.0.current,
            started.0.page_size
        );
        Some(started)
    }

    async fn fetch_list(self: Arc<Self>, mode: FetchMode, params: FetchParams, generation: u64) {
        let request = AssertUnwindSafe(self.source.fetch(params)).catch_unwind();
        let result = match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or_else(|_| Ok(Err(FetchError::Timeout(limit)))),
            None => request.await,
        }
        .unwrap_or_else(|_| Err(FetchError::request("data source panicked")));

        let outcome = {
            let mut state = self.lock_state();
            state.loading = Some(false);
            let dropped = std::mem::take(&mut state.dropped);
            if state.generation != generation {
                // The trigger that went with the bump was dropped on the latch.
                if dropped {
                    self.debouncer.trigger(FetchMode::Replace);
                }
                Outcome::Stale
            } else {
                match result {
                    Ok(response) if response.success => {
                        let loaded = response.data;
                        match mode {
                            FetchMode::Append => state.rows.extend(loaded.iter().cloned()),
                            FetchMode::Replace => state.rows = loaded.clone(),
                        }
                        let info = &mut state.page_info;
                        info.total = response.total;
                        info.has_more = info.total > info.page_size * info.page;
                        Outcome::Loaded(loaded)
                    }
                    Ok(_) => Outcome::SoftFailure,
                    Err(err) => Outcome::Failed(err),
                }
            }
        };
        self.publish();

        match outcome {
            Outcome::Loaded(rows) => {
                log::debug!("Loaded {} rows", rows.len());
                if let Some(on_load) = &self.options.on_load {
                    on_load(&rows);
                }
            }
            Outcome::SoftFailure => log::debug!("Data source reported failure, keeping rows"),
            Outcome::Failed(err) => {
                log::warn!("Fetch failed: {err}");
                if let Some(on_request_error) = &self.options.on_request_error {
                    on_request_error(&err);
                }
            }
            Outcome::Stale => log::warn!("Discarding stale fetch response"),
        }
    }
}

impl Drop for FetchInner {
    fn drop(&mut self) {
        self.debouncer.close();
    }
}

/// Releases debounced triggers into fetches until the state machine is gone.
async fn drive(inner: Weak<FetchInner>, debouncer: Debouncer<FetchMode>) {
    while let Some(mode) = debouncer.fired().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        log::trace!("Debounce window elapsed, starting {mode:?} fetch");
        if let Some((params, generation)) = inner.begin_fetch(mode) {
            tokio::spawn(inner.fetch_list(mode, params, generation));
        }
    }
}
