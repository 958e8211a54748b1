//! Search form configuration.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// Width of the grid the search form lays fields out on.
pub const GRID_COLUMNS: u32 = 24;

/// Responsive breakpoint of the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    Xs,
    Sm,
    Md,
    #[default]
    Lg,
    Xl,
    Xxl,
}

/// Grid span per breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColConfig {
    pub xs: u32,
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
    pub xxl: u32,
}

impl Default for ColConfig {
    fn default() -> Self {
        Self {
            xs: 24,
            sm: 12,
            md: 12,
            lg: 8,
            xl: 8,
            xxl: 6,
        }
    }
}

impl ColConfig {
    /// One field per row at every breakpoint, used by full-form mode.
    pub fn full_width() -> Self {
        Self {
            xs: 24,
            sm: 24,
            md: 24,
            lg: 24,
            xl: 24,
            xxl: 24,
        }
    }

    pub fn for_size(&self, size: ScreenSize) -> u32 {
        match size {
            ScreenSize::Xs => self.xs,
            ScreenSize::Sm => self.sm,
            ScreenSize::Md => self.md,
            ScreenSize::Lg => self.lg,
            ScreenSize::Xl => self.xl,
            ScreenSize::Xxl => self.xxl,
        }
    }
}

/// Field span: fixed, or per breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpanConfig {
    Fixed(u32),
    Responsive(ColConfig),
}

impl SpanConfig {
    /// Resolved span for a breakpoint, clamped to `1..=24`.
    pub fn span(&self, size: ScreenSize) -> u32 {
        let span = match self {
            SpanConfig::Fixed(span) => *span,
            SpanConfig::Responsive(config) => config.for_size(size),
        };
        span.clamp(1, GRID_COLUMNS)
    }
}

/// How submitted date values are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormatter {
    /// Pattern of the field's value type, e.g. `2024-03-05`.
    #[default]
    String,
    /// Epoch milliseconds.
    Number,
    /// Values pass through unchanged.
    #[serde(alias = "false")]
    Off,
}

/// Button and toggle labels; unset texts come from the message lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchTexts {
    pub search_text: Option<String>,
    pub reset_text: Option<String>,
    pub submit_text: Option<String>,
    /// Label of the toggle while collapsed.
    pub collapsed_text: Option<String>,
    /// Label of the toggle while expanded.
    pub expanded_text: Option<String>,
}

/// Callback fired when the collapse toggle changes state.
pub type OnCollapse = Arc<dyn Fn(bool) + Send + Sync>;

/// Configuration of a search form.
///
/// # Example
///
/// ```
/// use protable_lib::search::{SearchConfig, SpanConfig};
///
/// let config = SearchConfig::default()
///     .with_span(SpanConfig::Fixed(6))
///     .with_search_text("Find");
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    #[serde(flatten)]
    pub texts: SearchTexts,

    /// Field span; the mode default applies when unset.
    pub span: Option<SpanConfig>,

    /// Controlled collapsed state. Uncontrolled forms start collapsed.
    pub collapsed: Option<bool>,

    #[serde(skip)]
    pub on_collapse: Option<OnCollapse>,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_span(mut self, span: SpanConfig) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.texts.search_text = Some(text.into());
        self
    }

    pub fn with_reset_text(mut self, text: impl Into<String>) -> Self {
        self.texts.reset_text = Some(text.into());
        self
    }

    pub fn with_submit_text(mut self, text: impl Into<String>) -> Self {
        self.texts.submit_text = Some(text.into());
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    pub fn on_collapse<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_collapse = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("texts", &self.texts)
            .field("span", &self.span)
            .field("collapsed", &self.collapsed)
            .field("on_collapse", &self.on_collapse.is_some())
            .finish()
    }
}

/// Which search surface a table shows.
#[derive(Debug, Clone)]
pub enum SearchMode {
    /// No search form.
    Disabled,
    /// Inline search bar above the table, collapsible.
    Bar(SearchConfig),
    /// Full form; submissions are validated and not wired to fetching.
    Form(SearchConfig),
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Bar(SearchConfig::default())
    }
}

impl SearchMode {
    pub fn is_form(&self) -> bool {
        matches!(self, SearchMode::Form(_))
    }

    pub fn config(&self) -> Option<&SearchConfig> {
        match self {
            SearchMode::Disabled => None,
            SearchMode::Bar(config) | SearchMode::Form(config) => Some(config),
        }
    }
}
