//! Localized message lookup

use std::collections::HashMap;

/// Source of localized UI strings.
///
/// Keys follow a `component.message` layout, e.g. `tableForm.search`. A
/// missing key yields the caller's fallback.
pub trait Intl: Send + Sync {
    fn get_message(&self, key: &str, fallback: &str) -> String;
}

/// Message table backed by a map.
#[derive(Debug, Clone, Default)]
pub struct IntlMap {
    locale: String,
    messages: HashMap<String, String>,
}

const EN_US: &[(&str, &str)] = &[
    ("tableForm.search", "Query"),
    ("tableForm.reset", "Reset"),
    ("tableForm.submit", "Submit"),
    ("tableForm.collapsed", "Expand"),
    ("tableForm.expand", "Collapse"),
    ("tableForm.inputPlaceholder", "Please enter"),
    ("tableForm.selectPlaceholder", "Please select"),
    ("alert.clear", "Clear"),
    ("alert.selected", "Selected"),
    ("alert.item", "items"),
    ("pagination.total", "{start}-{end} of {total} items"),
    ("tableToolBar.reload", "Refresh"),
    ("tableToolBar.density", "Density"),
    ("tableToolBar.densityLarger", "Larger"),
    ("tableToolBar.densityMiddle", "Middle"),
    ("tableToolBar.densitySmall", "Compact"),
    ("tableToolBar.columnSetting", "Settings"),
    ("tableToolBar.fullScreen", "Full Screen"),
    ("tableToolBar.exitFullScreen", "Exit Full Screen"),
];

const ZH_CN: &[(&str, &str)] = &[
    ("tableForm.search", "查询"),
    ("tableForm.reset", "重置"),
    ("tableForm.submit", "提交"),
    ("tableForm.collapsed", "展开"),
    ("tableForm.expand", "收起"),
    ("tableForm.inputPlaceholder", "请输入"),
    ("tableForm.selectPlaceholder", "请选择"),
    ("alert.clear", "清空"),
    ("alert.selected", "已选择"),
    ("alert.item", "项"),
    ("pagination.total", "第 {start}-{end} 条/总共 {total} 条"),
    ("tableToolBar.reload", "刷新"),
    ("tableToolBar.density", "表格密度"),
    ("tableToolBar.densityLarger", "默认"),
    ("tableToolBar.densityMiddle", "中等"),
    ("tableToolBar.densitySmall", "紧凑"),
    ("tableToolBar.columnSetting", "列设置"),
    ("tableToolBar.fullScreen", "全屏"),
    ("tableToolBar.exitFullScreen", "退出全屏"),
];

impl IntlMap {
    /// Creates an empty table for `locale`.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: HashMap::new(),
        }
    }

    fn from_table(locale: &str, table: &[(&str, &str)]) -> Self {
        table
            .iter()
            .fold(Self::new(locale), |intl, (key, message)| intl.with(*key, *message))
    }

    /// Built-in English messages.
    pub fn en_us() -> Self {
        Self::from_table("en_US", EN_US)
    }

    /// Built-in Simplified Chinese messages.
    pub fn zh_cn() -> Self {
        Self::from_table("zh_CN", ZH_CN)
    }

    /// Built-in table for a locale name, English when unknown.
    pub fn for_locale(locale: &str) -> Self {
        match locale {
            "zh_CN" | "zh-CN" => Self::zh_cn(),
            _ => Self::en_us(),
        }
    }

    /// Adds or overrides a message.
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Intl for IntlMap {
    fn get_message(&self, key: &str, fallback: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Substitutes `{name}` placeholders in a message template.
pub fn format_message(template: &str, args: &[(&str, String)]) -> String {
    args.iter().fold(template.to_string(), |message, (name, value)| {
        message.replace(&format!("{{{name}}}"), value)
    })
}
