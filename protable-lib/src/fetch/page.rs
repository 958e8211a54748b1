//! Page state types.

use serde::Serialize;

use crate::model::Record;

/// Paging position and the server's row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    /// Row count last reported by the data source.
    pub total: usize,
    /// `total > page_size * page`, recomputed after every successful fetch.
    pub has_more: bool,
}

impl PageInfo {
    pub(crate) fn initial(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size,
            total: 0,
            has_more: false,
        }
    }
}

/// Partial page update for [`FetchData::set_page_info`](super::FetchData::set_page_info).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfoPatch {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub total: Option<usize>,
}

impl PageInfoPatch {
    pub fn page(page: usize) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn page_size(page_size: usize) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }
}

/// How a completed fetch merges into the loaded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

/// Observable state of a [`FetchData`](super::FetchData).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSnapshot {
    pub page_info: PageInfo,
    pub rows: Vec<Record>,
    /// `None` until the first fetch starts.
    pub loading: Option<bool>,
}

impl FetchSnapshot {
    pub fn is_loading(&self) -> bool {
        self.loading == Some(true)
    }
}
