//! Value types selecting cell formatting and search widgets

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::ProgressStatus;
use super::Record;

/// Fixed value-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    #[default]
    Text,
    Date,
    DateRange,
    DateTime,
    DateTimeRange,
    Time,
    Digit,
    Money,
    Percent,
    Progress,
    Textarea,
    Option,
    Index,
    IndexBorder,
    Avatar,
    Code,
}

impl ValueType {
    /// Returns `true` for tags that take part in date conversion.
    pub fn is_date(self) -> bool {
        matches!(
            self,
            ValueType::Date
                | ValueType::DateRange
                | ValueType::DateTime
                | ValueType::DateTimeRange
                | ValueType::Time
        )
    }

    /// Returns `true` for two-element range tags.
    pub fn is_range(self) -> bool {
        matches!(self, ValueType::DateRange | ValueType::DateTimeRange)
    }

    /// Purely presentational tags never become search fields.
    pub fn is_presentational(self) -> bool {
        matches!(self, ValueType::Index | ValueType::IndexBorder | ValueType::Option)
    }

    /// `chrono` pattern used to format or parse values of this tag.
    pub fn date_pattern(self) -> Option<&'static str> {
        match self {
            ValueType::Date | ValueType::DateRange => Some("%Y-%m-%d"),
            ValueType::DateTime | ValueType::DateTimeRange => Some("%Y-%m-%d %H:%M:%S"),
            ValueType::Time => Some("%H:%M:%S"),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Date => "date",
            ValueType::DateRange => "dateRange",
            ValueType::DateTime => "dateTime",
            ValueType::DateTimeRange => "dateTimeRange",
            ValueType::Time => "time",
            ValueType::Digit => "digit",
            ValueType::Money => "money",
            ValueType::Percent => "percent",
            ValueType::Progress => "progress",
            ValueType::Textarea => "textarea",
            ValueType::Option => "option",
            ValueType::Index => "index",
            ValueType::IndexBorder => "indexBorder",
            ValueType::Avatar => "avatar",
            ValueType::Code => "code",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency locale for money formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoneyLocale {
    /// Chinese yuan, `¥1,234.56`.
    #[default]
    #[serde(rename = "default", alias = "zh_CN")]
    Default,
    /// US dollar, `$1,234.56`.
    #[serde(rename = "en_US")]
    EnUs,
    /// Russian ruble, `1 234,56 ₽`.
    #[serde(rename = "ru_RU")]
    RuRu,
    /// Malaysian ringgit, `RM1,234.56`.
    #[serde(rename = "ms_MY")]
    MsMy,
}

/// Kind of a structured value-type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Progress,
    Money,
    Percent,
}

/// Structured value type carrying its own formatting options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueTypeDescriptor {
    #[serde(rename = "type")]
    pub kind: DescriptorKind,
    /// Explicit progress status, overriding the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProgressStatus>,
    /// Fixed number of fraction digits for percentages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
    #[serde(default)]
    pub locale: MoneyLocale,
    /// Prefix percentages with their sign.
    #[serde(default)]
    pub show_symbol: bool,
}

impl ValueTypeDescriptor {
    fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            status: None,
            precision: None,
            locale: MoneyLocale::Default,
            show_symbol: false,
        }
    }

    pub fn progress() -> Self {
        Self::new(DescriptorKind::Progress)
    }

    pub fn money() -> Self {
        Self::new(DescriptorKind::Money)
    }

    pub fn percent() -> Self {
        Self::new(DescriptorKind::Percent)
    }

    pub fn with_status(mut self, status: ProgressStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_locale(mut self, locale: MoneyLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_show_symbol(mut self, show_symbol: bool) -> Self {
        self.show_symbol = show_symbol;
        self
    }

    /// The tag that stands for this descriptor in the search form.
    pub fn tag(&self) -> ValueType {
        match self.kind {
            DescriptorKind::Progress => ValueType::Progress,
            DescriptorKind::Money => ValueType::Money,
            DescriptorKind::Percent => ValueType::Percent,
        }
    }
}

/// Outcome of resolving a column value type, for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedValueType {
    Tag(ValueType),
    Descriptor(ValueTypeDescriptor),
}

impl ResolvedValueType {
    pub fn tag(&self) -> ValueType {
        match self {
            ResolvedValueType::Tag(tag) => *tag,
            ResolvedValueType::Descriptor(descriptor) => descriptor.tag(),
        }
    }
}

/// Resolver computing a value type from a row.
pub type ValueTypeResolver = Arc<dyn Fn(&Record) -> ResolvedValueType + Send + Sync>;

/// Value type declared on a column.
#[derive(Clone)]
pub enum ColumnValueType {
    /// Fixed tag.
    Tag(ValueType),
    /// Fixed structured descriptor.
    Descriptor(ValueTypeDescriptor),
    /// Per-row resolver, e.g. a progress color that depends on row status.
    Resolver(ValueTypeResolver),
}

impl ColumnValueType {
    /// Wraps a row resolver.
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&Record) -> ResolvedValueType + Send + Sync + 'static,
    {
        ColumnValueType::Resolver(Arc::new(f))
    }

    /// Resolves the value type for a row.
    ///
    /// A resolver has nothing to decide on without a row and yields `None`.
    pub fn resolve(&self, row: Option<&Record>) -> Option<ResolvedValueType> {
        match self {
            ColumnValueType::Tag(tag) => Some(ResolvedValueType::Tag(*tag)),
            ColumnValueType::Descriptor(d) => Some(ResolvedValueType::Descriptor(d.clone())),
            ColumnValueType::Resolver(resolve) => row.map(|row| resolve(row)),
        }
    }

    /// Tag used outside of any row, e.g. to pick a search widget.
    ///
    /// Resolvers are asked with an empty row.
    pub fn static_tag(&self) -> ValueType {
        match self {
            ColumnValueType::Tag(tag) => *tag,
            ColumnValueType::Descriptor(d) => d.tag(),
            ColumnValueType::Resolver(resolve) => resolve(&Record::new()).tag(),
        }
    }
}

impl Default for ColumnValueType {
    fn default() -> Self {
        ColumnValueType::Tag(ValueType::Text)
    }
}

impl fmt::Debug for ColumnValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValueType::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            ColumnValueType::Descriptor(d) => f.debug_tuple("Descriptor").field(d).finish(),
            ColumnValueType::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<ValueType> for ColumnValueType {
    fn from(tag: ValueType) -> Self {
        ColumnValueType::Tag(tag)
    }
}

impl From<ValueTypeDescriptor> for ColumnValueType {
    fn from(descriptor: ValueTypeDescriptor) -> Self {
        ColumnValueType::Descriptor(descriptor)
    }
}

impl From<ResolvedValueType> for ColumnValueType {
    fn from(resolved: ResolvedValueType) -> Self {
        match resolved {
            ResolvedValueType::Tag(tag) => ColumnValueType::Tag(tag),
            ResolvedValueType::Descriptor(d) => ColumnValueType::Descriptor(d),
        }
    }
}
