//! Pagination modes and the pager view.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::config::Toggle;
use crate::fetch::PageInfo;
use crate::fetch::PageInfoPatch;
use crate::intl::Intl;
use crate::intl::format_message;

/// Callback receiving `(page, page_size)` after the user pages.
pub type OnPageChange = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Pager options.
///
/// Setting both `current` and `page_size` makes the pager controlled: the
/// host owns the position and pushes it back with
/// [`ProTable::sync_pagination`](super::ProTable::sync_pagination).
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    /// Default: 1
    pub default_current: usize,

    /// Default: 20
    pub default_page_size: usize,

    pub current: Option<usize>,
    pub page_size: Option<usize>,

    #[serde(skip)]
    pub on_change: Option<OnPageChange>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_current: 1,
            default_page_size: 20,
            current: None,
            page_size: None,
            on_change: None,
        }
    }
}

impl PaginationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_current(mut self, current: usize) -> Self {
        self.default_current = current;
        self
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Controlled position.
    pub fn controlled(mut self, current: usize, page_size: usize) -> Self {
        self.current = Some(current);
        self.page_size = Some(page_size);
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn is_controlled(&self) -> bool {
        self.current.is_some() && self.page_size.is_some()
    }

    pub fn initial_current(&self) -> usize {
        self.current.unwrap_or(self.default_current)
    }

    pub fn initial_page_size(&self) -> usize {
        self.page_size.unwrap_or(self.default_page_size)
    }
}

impl fmt::Debug for PaginationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationConfig")
            .field("default_current", &self.default_current)
            .field("default_page_size", &self.default_page_size)
            .field("current", &self.current)
            .field("page_size", &self.page_size)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Whether the table pages at all.
///
/// Deserializes from `false`, `true` or a [`PaginationConfig`] object.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Toggle<PaginationConfig>")]
pub enum Pagination {
    /// All loaded rows are shown; fetches still use the default page.
    Disabled,
    Enabled(PaginationConfig),
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::Enabled(PaginationConfig::default())
    }
}

impl From<Toggle<PaginationConfig>> for Pagination {
    fn from(toggle: Toggle<PaginationConfig>) -> Self {
        match toggle {
            Toggle::Flag(false) => Pagination::Disabled,
            Toggle::Flag(true) => Pagination::default(),
            Toggle::Config(config) => Pagination::Enabled(config),
        }
    }
}

impl Pagination {
    pub fn config(&self) -> Option<&PaginationConfig> {
        match self {
            Pagination::Disabled => None,
            Pagination::Enabled(config) => Some(config),
        }
    }

    /// First page and page size handed to the fetch state machine.
    pub fn fetch_defaults(&self) -> (usize, usize) {
        match self {
            Pagination::Disabled => (1, 20),
            Pagination::Enabled(config) => (config.initial_current(), config.initial_page_size()),
        }
    }
}

/// Translates a pager change into a page patch.
///
/// A new page size wins over a new page: the page returns to 1.
pub fn page_change_patch(info: &PageInfo, page: usize, page_size: usize) -> Option<PageInfoPatch> {
    if page_size != info.page_size {
        Some(PageInfoPatch::page_size(page_size))
    } else if page != info.page {
        Some(PageInfoPatch::page(page))
    } else {
        None
    }
}

/// What a pager shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub current: usize,
    pub page_size: usize,
    pub total: usize,
    /// 1-based first and last row numbers of the page; `(0, 0)` when empty.
    pub range: (usize, usize),
    pub total_text: String,
}

impl PaginationView {
    pub fn new(info: &PageInfo, total: usize, intl: &dyn Intl) -> Self {
        let range = if total == 0 {
            (0, 0)
        } else {
            let start = (info.page - 1) * info.page_size + 1;
            (start.min(total), (info.page * info.page_size).min(total))
        };
        let template = intl.get_message("pagination.total", "{start}-{end} of {total} items");
        let total_text = format_message(
            &template,
            &[
                ("start", range.0.to_string()),
                ("end", range.1.to_string()),
                ("total", total.to_string()),
            ],
        );
        Self {
            current: info.page,
            page_size: info.page_size,
            total,
            range,
            total_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intl::IntlMap;

    fn info(page: usize, page_size: usize) -> PageInfo {
        PageInfo {
            page,
            page_size,
            total: 57,
            has_more: true,
        }
    }

    #[test]
    fn test_deserialize_toggle() {
        let disabled: Pagination = serde_json::from_str("false").unwrap();
        assert!(matches!(disabled, Pagination::Disabled));
        let enabled: Pagination = serde_json::from_str("true").unwrap();
        assert_eq!(enabled.fetch_defaults(), (1, 20));
        let config: Pagination = serde_json::from_str(r#"{"defaultPageSize": 10, "current": 3, "pageSize": 5}"#).unwrap();
        assert_eq!(config.fetch_defaults(), (3, 5));
        assert!(config.config().unwrap().is_controlled());
    }

    #[test]
    fn test_page_change_patch() {
        let current = info(2, 20);
        assert_eq!(page_change_patch(&current, 3, 20), Some(PageInfoPatch::page(3)));
        assert_eq!(page_change_patch(&current, 3, 50), Some(PageInfoPatch::page_size(50)));
        assert_eq!(page_change_patch(&current, 2, 20), None);
    }

    #[test]
    fn test_view_ranges() {
        let intl = IntlMap::en_us();
        let view = PaginationView::new(&info(3, 20), 57, &intl);
        assert_eq!(view.range, (41, 57));
        assert_eq!(view.total_text, "41-57 of 57 items");
        let empty = PaginationView::new(&info(1, 20), 0, &intl);
        assert_eq!(empty.range, (0, 0));
    }
}
