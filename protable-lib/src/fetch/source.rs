//! Data sources feeding the fetch state machine.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::FetchError;
use crate::model::Record;
use crate::model::Value;

/// Normalized query parameters, ordered by name.
pub type QueryParams = BTreeMap<String, Value>;

/// Parameters handed to a [`DataSource`]: page, page size and filters.
///
/// Serializes flat, as `{"current": 1, "pageSize": 20, ...query}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub current: usize,
    pub page_size: usize,
    #[serde(flatten)]
    pub query: QueryParams,
}

impl FetchParams {
    pub fn new(current: usize, page_size: usize) -> Self {
        Self {
            current,
            page_size,
            query: QueryParams::new(),
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Returns a filter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.query.get(name)
    }

    /// Flat JSON form, as sent to backends.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert("current".into(), self.current.into());
        object.insert("pageSize".into(), self.page_size.into());
        for (name, value) in &self.query {
            object.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(object)
    }
}

fn default_success() -> bool {
    true
}

/// Response of a [`DataSource`].
///
/// `success: false` is a soft failure: the request completed but the backend
/// reported a business-level error, so loaded rows stay untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub total: usize,
}

impl RequestData {
    /// Successful page of `data` out of `total` rows.
    pub fn new(data: Vec<Record>, total: usize) -> Self {
        Self {
            data,
            success: true,
            total,
        }
    }

    /// Soft failure.
    pub fn failure() -> Self {
        Self {
            data: Vec::new(),
            success: false,
            total: 0,
        }
    }
}

/// Asynchronous provider of table rows.
///
/// # Example
///
/// ```ignore
/// struct Backend { client: HttpClient }
///
/// #[async_trait]
/// impl DataSource for Backend {
///     async fn fetch(&self, params: FetchParams) -> Result<RequestData, FetchError> {
///         let body = self.client.get("/rows", &params.to_json()).await?;
///         Ok(serde_json::from_str(&body)?)
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, params: FetchParams) -> Result<RequestData, FetchError>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn fetch(&self, params: FetchParams) -> Result<RequestData, FetchError> {
        (**self).fetch(params).await
    }
}

/// Data source backed by an async closure.
pub struct FnSource<F> {
    fetch: F,
}

impl<F, Fut> FnSource<F>
where
    F: Fn(FetchParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestData, FetchError>> + Send + 'static,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<F, Fut> DataSource for FnSource<F>
where
    F: Fn(FetchParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestData, FetchError>> + Send + 'static,
{
    async fn fetch(&self, params: FetchParams) -> Result<RequestData, FetchError> {
        (self.fetch)(params).await
    }
}

/// Local rows, returned whole on every fetch.
///
/// Used when a table has no request function; paging then happens locally
/// over the loaded rows.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Vec<Record>,
}

impl StaticSource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self, _params: FetchParams) -> Result<RequestData, FetchError> {
        Ok(RequestData::new(self.rows.clone(), self.rows.len()))
    }
}
