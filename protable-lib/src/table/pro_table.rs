//! The table orchestrator.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use async_trait::async_trait;
use tokio::sync::watch;

use super::ColumnManager;
use super::Density;
use super::OnColumnsStateChange;
use super::OnSizeChange;
use super::Pagination;
use super::PaginationView;
use super::RowSelection;
use super::SelectionAlert;
use super::SelectionChange;
use super::TableColumn;
use super::TableConfig;
use super::Toolbar;
use super::ToolbarAction;
use super::page_change_patch;
use crate::error::FetchError;
use crate::error::SearchError;
use crate::fetch::DataSource;
use crate::fetch::FetchData;
use crate::fetch::FetchOptions;
use crate::fetch::FetchParams;
use crate::fetch::FetchSnapshot;
use crate::fetch::OnLoad;
use crate::fetch::OnRequestError;
use crate::fetch::PageInfoPatch;
use crate::fetch::QueryParams;
use crate::fetch::RequestData;
use crate::fetch::StaticSource;
use crate::intl::Intl;
use crate::intl::IntlMap;
use crate::model::Column;
use crate::model::FixedSide;
use crate::model::Record;
use crate::render::CellOutput;
use crate::search::ScreenSize;
use crate::search::SearchForm;
use crate::search::SearchMode;

/// Callback receiving the normalized search values on submit.
pub type OnSubmit = Arc<dyn Fn(&QueryParams) + Send + Sync>;

pub type OnReset = Arc<dyn Fn() + Send + Sync>;

/// Rewrites search values before they become fetch parameters.
pub type BeforeSearchSubmit = Arc<dyn Fn(QueryParams) -> QueryParams + Send + Sync>;

/// Rewrites the rows of each response.
pub type PostData = Arc<dyn Fn(Vec<Record>) -> Vec<Record> + Send + Sync>;

#[derive(Clone, Default)]
struct TableHooks {
    on_load: Option<OnLoad>,
    on_request_error: Option<OnRequestError>,
    on_submit: Option<OnSubmit>,
    on_reset: Option<OnReset>,
    before_search_submit: Option<BeforeSearchSubmit>,
    post_data: Option<PostData>,
    on_columns_state_change: Option<OnColumnsStateChange>,
    on_size_change: Option<OnSizeChange>,
}

/// Request function wrapper applying `post_data`.
struct RequestSource {
    request: Arc<dyn DataSource>,
    post_data: Option<PostData>,
}

#[async_trait]
impl DataSource for RequestSource {
    async fn fetch(&self, params: FetchParams) -> Result<RequestData, FetchError> {
        let mut response = self.request.fetch(params).await?;
        if let Some(post_data) = &self.post_data {
            response.data = post_data(response.data);
        }
        Ok(response)
    }
}

type SharedSelection = Arc<Mutex<RowSelection>>;

fn lock(selection: &SharedSelection) -> MutexGuard<'_, RowSelection> {
    selection.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Applies `update` under the lock and reports the change once unlocked, so
/// `on_change` may call back into the table.
fn update_selection(
    selection: &SharedSelection,
    update: impl FnOnce(&mut RowSelection) -> Option<SelectionChange>,
) {
    let change = update(&mut lock(selection));
    if let Some(change) = change {
        change.notify();
    }
}

// =============================================================================
// Action handle
// =============================================================================

/// Imperative controls handed to the host; cheap to clone.
#[derive(Clone)]
pub struct ActionHandle {
    fetch: FetchData,
    selection: Option<SharedSelection>,
}

impl ActionHandle {
    /// Re-fetches; `reset_page` goes back to page 1 first.
    ///
    /// The selected keys are dropped since the rows are about to change.
    pub fn reload(&self, reset_page: bool) {
        if let Some(selection) = &self.selection {
            lock(selection).reset_keys();
        }
        if reset_page {
            self.fetch.reset_page_index();
        }
        self.fetch.reload();
    }

    pub fn fetch_more(&self) -> bool {
        self.fetch.fetch_more()
    }

    pub fn reset(&self) {
        self.fetch.reset();
    }

    pub fn clear_selected(&self) {
        if let Some(selection) = &self.selection {
            update_selection(selection, RowSelection::clear);
        }
    }
}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle").finish_non_exhaustive()
    }
}

// =============================================================================
// Rows
// =============================================================================

/// One rendered row: cells align with [`ProTable::leaf_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub key: String,
    pub cells: Vec<CellOutput>,
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ProTable`].
pub struct ProTableBuilder {
    columns: Vec<Column>,
    config: TableConfig,
    request: Option<Arc<dyn DataSource>>,
    data_source: Vec<Record>,
    default_data: Vec<Record>,
    intl: Arc<dyn Intl>,
    screen: ScreenSize,
    hooks: TableHooks,
}

impl ProTableBuilder {
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Remote request function. Without one, the table shows the rows given
    /// to [`with_data_source`](Self::with_data_source) and pages locally.
    pub fn with_request(mut self, request: impl DataSource + 'static) -> Self {
        self.request = Some(Arc::new(request));
        self
    }

    pub fn with_data_source(mut self, rows: Vec<Record>) -> Self {
        self.data_source = rows;
        self
    }

    /// Rows shown before the first fetch completes.
    pub fn with_default_data(mut self, rows: Vec<Record>) -> Self {
        self.default_data = rows;
        self
    }

    pub fn with_intl(mut self, intl: impl Intl + 'static) -> Self {
        self.intl = Arc::new(intl);
        self
    }

    pub fn with_screen_size(mut self, size: ScreenSize) -> Self {
        self.screen = size;
        self
    }

    pub fn on_load<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Record]) + Send + Sync + 'static,
    {
        self.hooks.on_load = Some(Arc::new(f));
        self
    }

    pub fn on_request_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&FetchError) + Send + Sync + 'static,
    {
        self.hooks.on_request_error = Some(Arc::new(f));
        self
    }

    pub fn on_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(&QueryParams) + Send + Sync + 'static,
    {
        self.hooks.on_submit = Some(Arc::new(f));
        self
    }

    pub fn on_reset<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.on_reset = Some(Arc::new(f));
        self
    }

    pub fn before_search_submit<F>(mut self, f: F) -> Self
    where
        F: Fn(QueryParams) -> QueryParams + Send + Sync + 'static,
    {
        self.hooks.before_search_submit = Some(Arc::new(f));
        self
    }

    pub fn post_data<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<Record>) -> Vec<Record> + Send + Sync + 'static,
    {
        self.hooks.post_data = Some(Arc::new(f));
        self
    }

    pub fn on_columns_state_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&super::ColumnsStateMap) + Send + Sync + 'static,
    {
        self.hooks.on_columns_state_change = Some(Arc::new(f));
        self
    }

    pub fn on_size_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Density) + Send + Sync + 'static,
    {
        self.hooks.on_size_change = Some(Arc::new(f));
        self
    }

    /// Mounts the table and schedules its first fetch.
    ///
    /// # Panics
    ///
    /// Must be called within a Tokio runtime.
    pub fn build(self) -> ProTable {
        let Self {
            columns,
            config,
            request,
            data_source,
            default_data,
            intl,
            screen,
            hooks,
        } = self;

        let selection = config
            .row_selection
            .clone()
            .map(|selection| Arc::new(Mutex::new(RowSelection::new(selection))));

        let (current, page_size) = config.pagination.fetch_defaults();
        let mut options = FetchOptions::default()
            .with_current(current)
            .with_page_size(page_size)
            .with_debounce(config.debounce())
            .with_default_data(default_data)
            .with_params(config.params.clone());
        options.on_request_error = hooks.on_request_error.clone();
        let on_load = hooks.on_load.clone();
        let loaded_selection = selection.clone();
        options = options.on_load(move |rows| {
            if let Some(selection) = &loaded_selection {
                update_selection(selection, RowSelection::clear);
            }
            if let Some(on_load) = &on_load {
                on_load(rows);
            }
        });

        let source: Arc<dyn DataSource> = match request {
            Some(request) => Arc::new(RequestSource {
                request,
                post_data: hooks.post_data.clone(),
            }),
            None => Arc::new(StaticSource::new(data_source)),
        };
        let fetch = FetchData::from_arc(source, options);

        let mut column_manager = ColumnManager::new(columns).with_state(config.columns_state_map.clone());
        column_manager.set_on_change(hooks.on_columns_state_change.clone());

        let mode = config.search_mode();
        let search = mode.config().map(|search| {
            SearchForm::new(column_manager.declared(), mode.is_form(), search.clone(), Arc::clone(&intl))
                .with_date_formatter(config.date_formatter)
                .with_screen_size(screen)
        });

        let mut toolbar = Toolbar::new(config.options, config.size);
        toolbar.set_on_size_change(hooks.on_size_change.clone());

        ProTable {
            fetch,
            columns: column_manager,
            search,
            mode,
            selection,
            toolbar,
            config,
            hooks,
            intl,
            search_params: QueryParams::new(),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// A headless table: column list, search form, paged rows, selection and
/// toolbar state over one data source.
///
/// # Example
///
/// ```
/// use protable_lib::model::{Column, Record, ValueType};
/// use protable_lib::table::ProTable;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let rows = (0..3).map(|i| Record::new().set("key", i).set("name", format!("row {i}"))).collect();
/// let table = ProTable::builder(vec![
///     Column::new("#").with_value_type(ValueType::Index),
///     Column::new("Name").with_data_path("name"),
/// ])
/// .with_data_source(rows)
/// .build();
///
/// table.settled().await;
/// let rendered = table.render_rows();
/// assert_eq!(rendered[2].cells[1].cell.plain_text(), "row 2");
/// # }
/// ```
pub struct ProTable {
    fetch: FetchData,
    columns: ColumnManager,
    search: Option<SearchForm>,
    mode: SearchMode,
    selection: Option<SharedSelection>,
    toolbar: Toolbar,
    config: TableConfig,
    hooks: TableHooks,
    intl: Arc<dyn Intl>,
    search_params: QueryParams,
}

impl ProTable {
    pub fn builder(columns: Vec<Column>) -> ProTableBuilder {
        ProTableBuilder {
            columns,
            config: TableConfig::default(),
            request: None,
            data_source: Vec::new(),
            default_data: Vec::new(),
            intl: Arc::new(IntlMap::en_us()),
            screen: ScreenSize::default(),
            hooks: TableHooks::default(),
        }
    }

    pub fn action(&self) -> ActionHandle {
        ActionHandle {
            fetch: self.fetch.clone(),
            selection: self.selection.clone(),
        }
    }

    pub fn fetch(&self) -> &FetchData {
        &self.fetch
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn intl(&self) -> &dyn Intl {
        self.intl.as_ref()
    }

    /// Waits for pending and in-flight fetches to finish.
    pub async fn settled(&self) {
        self.fetch.settled().await;
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot> {
        self.fetch.subscribe()
    }

    // =========================================================================
    // Columns
    // =========================================================================

    pub fn columns(&self) -> &ColumnManager {
        &self.columns
    }

    /// Visible columns in display order.
    pub fn table_columns(&self) -> Vec<&TableColumn> {
        self.columns.visible()
    }

    /// Visible columns that carry cells.
    pub fn leaf_columns(&self) -> Vec<&TableColumn> {
        self.columns.leaves()
    }

    /// Replaces the column declarations.
    ///
    /// See [`ColumnManager::set_columns`] for how changes are detected; the
    /// search form is re-derived only on a detected change.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        if !self.columns.set_columns(columns) {
            return;
        }
        if let Some(search) = &mut self.search {
            search.set_columns(self.columns.declared());
        }
    }

    pub fn set_column_show(&mut self, key: &str, show: bool) {
        self.columns.set_show(key, show);
    }

    pub fn set_column_fixed(&mut self, key: &str, fixed: Option<FixedSide>) {
        self.columns.set_fixed(key, fixed);
    }

    pub fn move_column(&mut self, key: &str, position: usize) {
        self.columns.move_column(key, position);
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn search_form(&self) -> Option<&SearchForm> {
        self.search.as_ref()
    }

    pub fn search_form_mut(&mut self) -> Option<&mut SearchForm> {
        self.search.as_mut()
    }

    pub fn search_mode(&self) -> &SearchMode {
        &self.mode
    }

    /// Submits the search form.
    ///
    /// In bar mode the values become the fetch parameters and the table
    /// returns to page 1. A full form only validates and reports through
    /// `on_submit`.
    pub fn submit_search(&mut self) -> Result<QueryParams, SearchError> {
        let form = self.search.as_ref().ok_or(SearchError::Disabled)?;
        let values = form.submit()?;
        if !form.is_form() {
            self.apply_search_params(values.clone(), true);
        }
        if let Some(on_submit) = &self.hooks.on_submit {
            on_submit(&values);
        }
        Ok(values)
    }

    /// Restores the initial form values and clears the search parameters.
    pub fn reset_search(&mut self) {
        if let Some(form) = &mut self.search {
            form.reset();
        }
        self.apply_search_params(QueryParams::new(), false);
        if let Some(on_reset) = &self.hooks.on_reset {
            on_reset();
        }
    }

    fn apply_search_params(&mut self, values: QueryParams, always_fetch: bool) {
        self.search_params = match &self.hooks.before_search_submit {
            Some(before) => before(values),
            None => values,
        };
        self.fetch.reset_page_index();
        let changed = self.fetch.set_params(self.merged_params());
        if always_fetch && !changed {
            self.fetch.reload();
        }
    }

    /// Replaces the external parameters sent with every fetch.
    pub fn set_params(&mut self, params: QueryParams) {
        self.config.params = params;
        self.fetch.set_params(self.merged_params());
    }

    /// Search values overlaid with the external parameters.
    pub fn merged_params(&self) -> QueryParams {
        let mut params = self.search_params.clone();
        params.extend(self.config.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn pagination(&self) -> Option<PaginationView> {
        self.config.pagination.config()?;
        let info = self.fetch.page_info();
        Some(PaginationView::new(&info, info.total, self.intl.as_ref()))
    }

    /// Handles a pager change and notifies the pagination `on_change`.
    pub fn change_page(&self, page: usize, page_size: usize) {
        let Some(config) = self.config.pagination.config() else {
            return;
        };
        if let Some(patch) = page_change_patch(&self.fetch.page_info(), page, page_size) {
            self.fetch.set_page_info(patch);
        }
        if let Some(on_change) = &config.on_change {
            on_change(page, page_size);
        }
    }

    /// Pushes a controlled pager position into the fetch state.
    pub fn sync_pagination(&self, current: usize, page_size: usize) {
        self.fetch.set_page_info(PageInfoPatch {
            page: Some(current),
            page_size: Some(page_size),
            total: None,
        });
    }

    // =========================================================================
    // Rows
    // =========================================================================

    pub fn loading(&self) -> Option<bool> {
        self.fetch.loading()
    }

    /// All loaded rows.
    pub fn rows(&self) -> Vec<Record> {
        self.fetch.rows()
    }

    /// Offset of the current page within the loaded rows.
    fn page_offset(&self, loaded: usize) -> usize {
        if matches!(self.config.pagination, Pagination::Disabled) {
            return 0;
        }
        let info = self.fetch.page_info();
        if loaded > info.page_size {
            ((info.page - 1) * info.page_size).min(loaded)
        } else {
            0
        }
    }

    /// Rows of the current page.
    ///
    /// When more rows are loaded than fit a page, the page is sliced out of
    /// them locally.
    pub fn page_rows(&self) -> Vec<Record> {
        let rows = self.fetch.rows();
        if matches!(self.config.pagination, Pagination::Disabled) {
            return rows;
        }
        let page_size = self.fetch.page_info().page_size;
        let offset = self.page_offset(rows.len());
        if rows.len() > page_size {
            rows.into_iter().skip(offset).take(page_size).collect()
        } else {
            rows
        }
    }

    /// Renders every cell of the current page.
    pub fn render_rows(&self) -> Vec<RenderedRow> {
        let offset = self.page_offset(self.fetch.rows().len());
        let leaves = self.leaf_columns();
        let empty_text = self.config.column_empty_text.as_deref();
        self.page_rows()
            .iter()
            .enumerate()
            .map(|(index, row)| RenderedRow {
                key: self.config.row_key.key_of(row, offset + index),
                cells: leaves
                    .iter()
                    .map(|column| column.render(row, index, empty_text))
                    .collect(),
            })
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selected_keys(&self) -> Vec<String> {
        self.selection
            .as_ref()
            .map(|selection| lock(selection).keys().to_vec())
            .unwrap_or_default()
    }

    pub fn selected_rows(&self) -> Vec<Record> {
        let Some(selection) = &self.selection else {
            return Vec::new();
        };
        let rows = self.fetch.rows();
        lock(selection).selected_rows(&rows, &self.config.row_key)
    }

    pub fn select_rows(&self, keys: Vec<String>) {
        if let Some(selection) = &self.selection {
            let rows = self.fetch.rows();
            update_selection(selection, |selection| {
                selection.select(keys, &rows, &self.config.row_key)
            });
        }
    }

    pub fn toggle_row(&self, key: &str) {
        if let Some(selection) = &self.selection {
            let rows = self.fetch.rows();
            update_selection(selection, |selection| {
                selection.toggle(key, &rows, &self.config.row_key)
            });
        }
    }

    /// Pushes controlled selection keys.
    pub fn set_selected_keys(&self, keys: Vec<String>) {
        if let Some(selection) = &self.selection {
            lock(selection).set_controlled_keys(keys);
        }
    }

    pub fn selection_alert(&self) -> Option<SelectionAlert> {
        let selection = self.selection.as_ref()?;
        lock(selection).alert(self.intl.as_ref())
    }

    // =========================================================================
    // Toolbar
    // =========================================================================

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn density(&self) -> Density {
        self.toolbar.density()
    }

    pub fn set_density(&mut self, density: Density) {
        self.toolbar.set_density(density);
    }

    pub fn toolbar_actions(&self) -> Vec<(ToolbarAction, String)> {
        self.toolbar.actions(self.intl.as_ref())
    }

    /// Runs a button that acts by itself; menu buttons are left to the host.
    pub fn run_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Reload => self.action().reload(false),
            ToolbarAction::FullScreen => {
                self.toolbar.toggle_full_screen();
            }
            ToolbarAction::Density | ToolbarAction::Setting => {}
        }
    }
}

impl fmt::Debug for ProTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProTable")
            .field("fetch", &self.fetch)
            .field("columns", &self.columns)
            .field("mode", &self.mode)
            .field("toolbar", &self.toolbar)
            .field("search_params", &self.search_params)
            .finish_non_exhaustive()
    }
}
