//! Table column derivation, pinning and ordering.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Column;
use crate::model::EnumOption;
use crate::model::FixedSide;
use crate::model::Record;
use crate::model::duplicate_keys;
use crate::render::CellOutput;
use crate::render::render_cell;

/// Width given to pinned columns without an explicit width.
pub const DEFAULT_FIXED_WIDTH: u32 = 200;

/// Host-controlled visibility and pinning of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnState {
    pub show: bool,
    pub fixed: Option<FixedSide>,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self {
            show: true,
            fixed: None,
        }
    }
}

/// Column states by column key.
pub type ColumnsStateMap = BTreeMap<String, ColumnState>;

/// Callback receiving the whole map after a column setting changes.
pub type OnColumnsStateChange = Arc<dyn Fn(&ColumnsStateMap) + Send + Sync>;

/// A column as the table renders it.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub key: String,
    pub title: String,
    /// Declared position among its siblings.
    pub index: usize,
    pub fixed: Option<FixedSide>,
    pub width: Option<u32>,
    /// Filter choices from the value enum, without the `all` sentinel.
    pub filters: Vec<EnumOption>,
    pub children: Vec<TableColumn>,
    column: Column,
}

impl TableColumn {
    /// The declaration this column was derived from.
    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether `row` passes the header filter `filter`.
    ///
    /// Numbers compare by their decimal text; falsy values compare as `""`.
    pub fn matches_filter(&self, filter: &str, row: &Record) -> bool {
        let text = match self.column.value_in(row) {
            Some(value) if value.is_truthy() => value.to_string(),
            _ => String::new(),
        };
        text == filter
    }

    pub fn render(&self, row: &Record, index: usize, empty_text: Option<&str>) -> CellOutput {
        render_cell(&self.column, row, index, empty_text)
    }
}

/// Derives table columns from declarations.
///
/// Columns hidden in the table are dropped; pinning comes from `state` when
/// the column has an entry there, else from the declaration.
pub fn gen_column_list(columns: &[Column], state: &ColumnsStateMap) -> Vec<TableColumn> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, column)| !column.hide_in_table)
        .map(|(index, column)| {
            let key = column.column_key(index);
            let fixed = match state.get(&key) {
                Some(entry) => entry.fixed,
                None => column.fixed,
            };
            let filters = column
                .value_enum
                .as_ref()
                .map(|value_enum| value_enum.filter_options())
                .unwrap_or_default();
            TableColumn {
                key,
                title: column.title.clone(),
                index,
                fixed,
                width: column
                    .width
                    .or_else(|| column.fixed.map(|_| DEFAULT_FIXED_WIDTH)),
                filters,
                children: gen_column_list(&column.children, state),
                column: column.clone(),
            }
        })
        .collect()
}

/// Sorts pinned-left columns first and pinned-right columns last; the rest
/// follow `order`, a list of column keys. Keys missing from `order` keep
/// their relative position after the listed ones.
pub fn sort_columns(columns: &mut [TableColumn], order: &[String]) {
    columns.sort_by_key(|column| {
        let side = match column.fixed {
            Some(FixedSide::Left) => 0,
            None => 1,
            Some(FixedSide::Right) => 2,
        };
        let position = order
            .iter()
            .position(|key| key == &column.key)
            .unwrap_or(order.len());
        (side, position)
    });
}

/// Identity of a column list, used to tell real column changes from
/// re-renders with equal declarations.
fn signature(columns: &[Column]) -> String {
    format!("{columns:?}")
}

/// Derived column list kept in sync with declarations and column settings.
///
/// # Example
///
/// ```
/// use protable_lib::model::{Column, FixedSide};
/// use protable_lib::table::ColumnManager;
///
/// let mut manager = ColumnManager::new(vec![
///     Column::new("Name").with_key("name"),
///     Column::new("Actions").with_key("actions").with_fixed(FixedSide::Right),
///     Column::new("Age").with_key("age"),
/// ]);
/// manager.set_show("age", false);
///
/// let keys: Vec<_> = manager.visible().iter().map(|c| c.key.as_str()).collect();
/// assert_eq!(keys, ["name", "actions"]);
/// ```
#[derive(Clone, Default)]
pub struct ColumnManager {
    declared: Vec<Column>,
    signature: String,
    state: ColumnsStateMap,
    sort_keys: Vec<String>,
    derived: Vec<TableColumn>,
    on_change: Option<OnColumnsStateChange>,
}

impl ColumnManager {
    pub fn new(columns: Vec<Column>) -> Self {
        let mut manager = Self::default();
        manager.set_columns(columns);
        manager
    }

    pub fn with_state(mut self, state: ColumnsStateMap) -> Self {
        self.state = state;
        self.refresh();
        self
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&ColumnsStateMap) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub(crate) fn set_on_change(&mut self, on_change: Option<OnColumnsStateChange>) {
        self.on_change = on_change;
    }

    /// Replaces the declarations.
    ///
    /// Columns are compared by their `Debug` form, which leaves out the
    /// `render` and `render_text` hooks. Returns `false` when nothing else
    /// differs: the new hooks are still taken, the ordering is kept.
    pub fn set_columns(&mut self, columns: Vec<Column>) -> bool {
        let signature = signature(&columns);
        if signature == self.signature && !self.derived.is_empty() {
            self.declared = columns;
            self.refresh();
            return false;
        }
        duplicate_keys(&columns);
        self.signature = signature;
        self.declared = columns;
        self.sort_keys = gen_column_list(&self.declared, &self.state)
            .into_iter()
            .map(|column| column.key)
            .collect();
        self.refresh();
        true
    }

    fn refresh(&mut self) {
        let mut derived = gen_column_list(&self.declared, &self.state);
        sort_columns(&mut derived, &self.sort_keys);
        self.derived = derived;
    }

    fn update_state(&mut self, key: &str, update: impl FnOnce(&mut ColumnState)) {
        let entry = self.state.entry(key.to_string()).or_default();
        let before = *entry;
        update(entry);
        if *entry == before {
            return;
        }
        self.refresh();
        if let Some(on_change) = &self.on_change {
            on_change(&self.state);
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn set_show(&mut self, key: &str, show: bool) {
        self.update_state(key, |state| state.show = show);
    }

    /// Pins a column, or unpins it with `None`.
    pub fn set_fixed(&mut self, key: &str, fixed: Option<FixedSide>) {
        self.update_state(key, |state| state.fixed = fixed);
    }

    /// Moves a column to `position` among the unpinned ordering.
    pub fn move_column(&mut self, key: &str, position: usize) {
        let Some(from) = self.sort_keys.iter().position(|k| k == key) else {
            return;
        };
        let moved = self.sort_keys.remove(from);
        let to = position.min(self.sort_keys.len());
        self.sort_keys.insert(to, moved);
        self.refresh();
    }

    /// Replaces the whole state map, e.g. from a controlled host.
    pub fn set_state(&mut self, state: ColumnsStateMap) {
        if state != self.state {
            self.state = state;
            self.refresh();
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn declared(&self) -> &[Column] {
        &self.declared
    }

    pub fn state(&self) -> &ColumnsStateMap {
        &self.state
    }

    /// All derived columns in display order, including hidden ones.
    pub fn columns(&self) -> &[TableColumn] {
        &self.derived
    }

    /// Columns not switched off in the state map.
    pub fn visible(&self) -> Vec<&TableColumn> {
        self.derived
            .iter()
            .filter(|column| self.state.get(&column.key).is_none_or(|s| s.show))
            .collect()
    }

    /// Visible columns that carry cells: groups are replaced by their leaves.
    pub fn leaves(&self) -> Vec<&TableColumn> {
        fn collect<'a>(column: &'a TableColumn, out: &mut Vec<&'a TableColumn>) {
            if column.is_group() {
                column.children.iter().for_each(|child| collect(child, out));
            } else {
                out.push(column);
            }
        }
        let mut leaves = Vec::new();
        for column in self.visible() {
            collect(column, &mut leaves);
        }
        leaves
    }
}

impl fmt::Debug for ColumnManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnManager")
            .field("columns", &self.derived)
            .field("state", &self.state)
            .field("sort_keys", &self.sort_keys)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::model::Value;
    use crate::model::ValueEnum;

    fn keys(columns: &[&TableColumn]) -> Vec<String> {
        columns.iter().map(|c| c.key.clone()).collect()
    }

    #[test]
    fn test_gen_column_list() {
        let columns = vec![
            Column::new("Name").with_data_path("name"),
            Column::new("Secret").with_data_path("secret").hide_in_table(),
            Column::new("Status")
                .with_data_path("status")
                .with_value_enum(ValueEnum::new().with("all", "All").with("open", "Open"))
                .with_fixed(FixedSide::Left),
            Column::new("Group").with_children(vec![Column::new("Child").with_key("child")]),
        ];
        let list = gen_column_list(&columns, &ColumnsStateMap::new());
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].key, "status");
        assert_eq!(list[1].index, 2);
        assert_eq!(list[1].width, Some(DEFAULT_FIXED_WIDTH));
        assert_eq!(list[1].filters.len(), 1);
        assert_eq!(list[1].filters[0].value, "open");
        assert_eq!(list[2].key, "3");
        assert_eq!(list[2].children[0].key, "child");
    }

    #[test]
    fn test_state_overrides_fixed() {
        let columns = vec![Column::new("A").with_key("a").with_fixed(FixedSide::Left)];
        let mut state = ColumnsStateMap::new();
        state.insert("a".into(), ColumnState::default());
        let list = gen_column_list(&columns, &state);
        assert_eq!(list[0].fixed, None);
        assert_eq!(list[0].width, Some(DEFAULT_FIXED_WIDTH));
    }

    #[test]
    fn test_matches_filter() {
        let columns = vec![Column::new("N").with_data_path("n")];
        let column = &gen_column_list(&columns, &ColumnsStateMap::new())[0];
        assert!(column.matches_filter("3", &Record::new().set("n", 3i64)));
        assert!(column.matches_filter("", &Record::new().set("n", 0i64)));
        assert!(column.matches_filter("", &Record::new()));
        assert!(!column.matches_filter("x", &Record::new().set("n", Value::Null)));
    }

    #[test]
    fn test_pinned_sort_order() {
        let mut manager = ColumnManager::new(vec![
            Column::new("a").with_key("a").with_fixed(FixedSide::Right),
            Column::new("b").with_key("b"),
            Column::new("c").with_key("c").with_fixed(FixedSide::Left),
            Column::new("d").with_key("d"),
        ]);
        assert_eq!(keys(&manager.visible()), ["c", "b", "d", "a"]);

        manager.move_column("d", 0);
        assert_eq!(keys(&manager.visible()), ["c", "d", "b", "a"]);

        manager.set_fixed("c", None);
        assert_eq!(keys(&manager.visible()), ["d", "b", "c", "a"]);
    }

    #[test]
    fn test_show_and_callback() {
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let mut manager = ColumnManager::new(vec![
            Column::new("a").with_key("a"),
            Column::new("b").with_key("b"),
        ])
        .on_change(move |_| *counter.lock().unwrap() += 1);

        manager.set_show("b", false);
        manager.set_show("b", false);
        assert_eq!(keys(&manager.visible()), ["a"]);
        assert_eq!(manager.columns().len(), 2);
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_set_columns_signature() {
        let columns = vec![Column::new("a").with_key("a"), Column::new("b").with_key("b")];
        let mut manager = ColumnManager::new(columns.clone());
        manager.move_column("b", 0);
        assert!(!manager.set_columns(columns.clone()));
        assert_eq!(keys(&manager.visible()), ["b", "a"]);

        let mut changed = columns;
        changed.push(Column::new("c").with_key("c"));
        assert!(manager.set_columns(changed));
        assert_eq!(keys(&manager.visible()), ["a", "b", "c"]);
    }

    #[test]
    fn test_set_columns_takes_new_hooks() {
        let columns = |suffix: &'static str| {
            vec![
                Column::new("a").with_key("a").with_data_path("a"),
                Column::new("b")
                    .with_key("b")
                    .with_data_path("b")
                    .with_render_text(move |value, _, _| Value::from(format!("{value}{suffix}"))),
            ]
        };
        let row = Record::new().set("a", "x").set("b", "y");
        let mut manager = ColumnManager::new(columns("!"));
        manager.move_column("b", 0);
        assert_eq!(manager.visible()[0].render(&row, 0, None).cell.plain_text(), "y!");

        assert!(!manager.set_columns(columns("?")));
        assert_eq!(keys(&manager.visible()), ["b", "a"]);
        assert_eq!(manager.visible()[0].render(&row, 0, None).cell.plain_text(), "y?");
    }

    #[test]
    fn test_leaves_flatten_groups() {
        let manager = ColumnManager::new(vec![
            Column::new("a").with_key("a"),
            Column::new("g").with_key("g").with_children(vec![
                Column::new("x").with_key("x"),
                Column::new("y").with_key("y"),
            ]),
        ]);
        assert_eq!(keys(&manager.leaves()), ["a", "x", "y"]);
    }
}
