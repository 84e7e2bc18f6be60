//! Tabular data store
//!
//! [`TabularStore`] owns the cell values of a grid together with three derived
//! structures that keep interactive operations cheap:
//!
//! - a search index with one lowercased text entry per row,
//! - a sort cache with precomputed ascending/descending row orders for every
//!   sortable column,
//! - the materialized visible-row sequence (active sort order filtered by the
//!   active search query).
//!
//! Edits repair only the structures that depend on the edited column, and the
//! repair is complete before [`TabularStore::update_cell`] returns.

mod search;
mod selection;
mod sort_cache;

use std::collections::HashMap;

use crate::model::CellValue;
use crate::model::ColumnDescriptor;
use crate::model::Record;
use crate::model::SortDirection;
use crate::model::SortState;

use search::SearchIndex;
use search::normalize_query;
use selection::SelectionSet;
use sort_cache::SortCache;
use sort_cache::SortKey;

/// In-memory data engine behind one grid.
///
/// The row-index space is fixed by [`init`](Self::init): rows are numbered in
/// input order and indices are never reused or compacted. Lookups on unknown
/// rows or fields return `None` or do nothing; no operation returns an error.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{CellType, CellValue, ColumnDescriptor, Record, SortDirection};
/// use tabula_lib::store::TabularStore;
///
/// let columns = vec![
///     ColumnDescriptor::new("name", "Name", CellType::Text).searchable().sortable(),
///     ColumnDescriptor::new("age", "Age", CellType::Number).sortable(),
/// ];
/// let rows: Vec<Record> = [("Bob", "30"), ("Al", "40"), ("Cy", "20")]
///     .into_iter()
///     .map(|(name, age)| {
///         Record::from([
///             ("name".to_string(), CellValue::from(name)),
///             ("age".to_string(), CellValue::from(age)),
///         ])
///     })
///     .collect();
///
/// let mut store = TabularStore::new();
/// store.init(columns, rows);
/// store.sort(Some("age"), Some(SortDirection::Asc));
/// assert_eq!(store.visible_rows(), vec![2, 0, 1]);
///
/// store.search("al");
/// assert_eq!(store.visible_rows(), vec![1]);
/// ```
#[derive(Debug, Default)]
pub struct TabularStore {
    columns: Vec<ColumnDescriptor>,
    column_index: HashMap<String, usize>,
    /// `cells[row][column]`.
    cells: Vec<Vec<Option<CellValue>>>,
    search: SearchIndex,
    sort_cache: SortCache,
    visible: Vec<usize>,
    query: String,
    sort: SortState,
    selection: SelectionSet,
}

impl TabularStore {
    /// Creates an empty store. Call [`init`](Self::init) to load data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the dataset, replacing any previous state.
    ///
    /// Populates the cells, one search entry per row, the default order and
    /// both sort orders of every sortable column. Field names must be unique;
    /// a repeated field name is ignored after its first occurrence.
    pub fn init(&mut self, columns: Vec<ColumnDescriptor>, rows: impl IntoIterator<Item = Record>) {
        let mut unique: Vec<ColumnDescriptor> = Vec::with_capacity(columns.len());
        let mut column_index = HashMap::with_capacity(columns.len());
        for column in columns {
            if column_index.contains_key(&column.field_name) {
                log::warn!("duplicate column '{}' ignored", column.field_name);
                continue;
            }
            column_index.insert(column.field_name.clone(), unique.len());
            unique.push(column);
        }

        let cells: Vec<Vec<Option<CellValue>>> = rows
            .into_iter()
            .map(|mut record| {
                unique
                    .iter()
                    .map(|column| record.remove(&column.field_name))
                    .collect()
            })
            .collect();

        let row_count = cells.len();
        *self = Self {
            columns: unique,
            column_index,
            cells,
            search: SearchIndex::with_capacity(row_count),
            sort_cache: SortCache::new(row_count),
            visible: Vec::new(),
            query: String::new(),
            sort: SortState::default(),
            selection: SelectionSet::default(),
        };

        let selecting = self.columns.iter().position(|c| c.selects_row);
        for row in 0..row_count {
            let text = self.search_text(row);
            self.search.push(text);

            let selected = selecting
                .and_then(|col| self.cells[row][col].as_ref())
                .is_some_and(CellValue::is_truthy);
            self.selection.set(row, selected);
        }

        for col in 0..self.columns.len() {
            if self.columns[col].is_sortable {
                self.rebuild_sort_cache(col);
            }
        }

        self.visible = self.sort_cache.default_order().to_vec();
        log::debug!(
            "store initialized: {} rows, {} columns",
            row_count,
            self.columns.len()
        );
    }

    // -------------------------------------------------------------------------
    // Cells
    // -------------------------------------------------------------------------

    /// Value of one cell, or `None` if absent or unknown.
    pub fn cell_value(&self, row: usize, field: &str) -> Option<&CellValue> {
        let col = *self.column_index.get(field)?;
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// Writes one cell and repairs the derived structures of its column.
    ///
    /// The value is stored as given; validation is the caller's concern.
    /// Writes to unknown rows or fields are ignored.
    pub fn update_cell(&mut self, row: usize, field: &str, value: Option<CellValue>) {
        let Some(&col) = self.column_index.get(field) else {
            log::debug!("update_cell: unknown field '{}'", field);
            return;
        };
        let Some(slot) = self.cells.get_mut(row).and_then(|cells| cells.get_mut(col)) else {
            log::debug!("update_cell: unknown row {}", row);
            return;
        };
        *slot = value;

        let searchable = self.columns[col].is_searchable;
        let sortable = self.columns[col].is_sortable;

        if searchable {
            let text = self.search_text(row);
            self.search.replace(row, text);
        }
        if sortable {
            self.rebuild_sort_cache(col);
        }

        let affects_view = (searchable && !self.query.is_empty())
            || (sortable && self.sort.is_sorted_by(field));
        if affects_view {
            self.refresh_visible();
        }
    }

    /// Field-keyed copy of one row. Absent cells are omitted.
    pub fn row_data(&self, row: usize) -> Record {
        let Some(cells) = self.cells.get(row) else {
            return Record::new();
        };
        self.columns
            .iter()
            .zip(cells)
            .filter_map(|(column, value)| {
                value
                    .as_ref()
                    .map(|v| (column.field_name.clone(), v.clone()))
            })
            .collect()
    }

    /// Column descriptors in display order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.column_index.get(field).map(|&col| &self.columns[col])
    }

    /// Size of the row-index space.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    // -------------------------------------------------------------------------
    // Search and sort
    // -------------------------------------------------------------------------

    /// Filters the active sort order to rows containing `query`.
    ///
    /// The query is trimmed and lowercased. An empty query shows the active
    /// sort order unfiltered.
    pub fn search(&mut self, query: &str) {
        self.query = normalize_query(query);
        self.refresh_visible();
    }

    /// The active normalized query, empty when no filter is applied.
    pub fn search_query(&self) -> &str {
        &self.query
    }

    /// Switches the active sort order.
    ///
    /// `None` for either argument reverts to the default order. The active
    /// search query is re-applied to the new order. A field without a sort
    /// cache (unknown or not sortable) leaves everything unchanged.
    pub fn sort(&mut self, field: Option<&str>, direction: Option<SortDirection>) {
        self.sort = match (field, direction) {
            (Some(field), Some(direction)) => {
                if !self.sort_cache.contains(field) {
                    log::debug!("sort: no sort cache for '{}'", field);
                    return;
                }
                SortState {
                    field: Some(field.to_string()),
                    direction: Some(direction),
                }
            }
            _ => SortState::default(),
        };
        self.refresh_visible();
    }

    pub fn sort_state(&self) -> SortState {
        self.sort.clone()
    }

    /// Snapshot of the current view, in display order.
    pub fn visible_rows(&self) -> Vec<usize> {
        self.visible.clone()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Sets one row's selection flag. Rows outside the index space are ignored.
    pub fn select_row(&mut self, row: usize, selected: bool) {
        if row < self.row_count() {
            self.selection.set(row, selected);
        }
    }

    pub fn toggle_row_selection(&mut self, row: usize) {
        if row < self.row_count() {
            self.selection.toggle(row);
        }
    }

    /// Sets the flag of every visible row; hidden rows keep their state.
    pub fn select_all_visible(&mut self, selected: bool) {
        self.selection.set_all(&self.visible, selected);
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.is_selected(row)
    }

    /// Snapshot of the selected rows in ascending row order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.selection.selected()
    }

    // -------------------------------------------------------------------------
    // Derived structures
    // -------------------------------------------------------------------------

    fn search_text(&self, row: usize) -> String {
        let cells = &self.cells[row];
        self.columns
            .iter()
            .zip(cells)
            .filter(|(column, _)| column.is_searchable)
            .filter_map(|(_, value)| value.as_ref())
            .map(|value| value.to_string().to_lowercase())
            .collect()
    }

    fn rebuild_sort_cache(&mut self, col: usize) {
        let column = &self.columns[col];
        let cells = &self.cells;
        self.sort_cache.rebuild(&column.field_name, |row| {
            SortKey::new(column.cell_type, cells[row][col].as_ref())
        });
    }

    fn active_order(&self) -> &[usize] {
        match (&self.sort.field, self.sort.direction) {
            (Some(field), Some(direction)) => self
                .sort_cache
                .get(field, direction)
                .unwrap_or(self.sort_cache.default_order()),
            _ => self.sort_cache.default_order(),
        }
    }

    /// Recomputes the visible rows from the active order and query.
    ///
    /// Matches are computed fresh from the search index, and the result keeps
    /// the order of the active sort rather than the scan order.
    fn refresh_visible(&mut self) {
        let order = self.active_order();
        let visible = if self.query.is_empty() {
            order.to_vec()
        } else {
            let matches = self.search.matches(&self.query);
            order
                .iter()
                .copied()
                .filter(|row| matches.contains(row))
                .collect()
        };
        self.visible = visible;
        log::trace!(
            "visible rows: {} of {}",
            self.visible.len(),
            self.cells.len()
        );
    }
}
