//! Grid facade
//!
//! A [`Grid`] pairs one [`TabularStore`] with one [`ColumnLayoutEngine`] and
//! carries the status flags a view needs: loading, error, ready, resizing and
//! the select-all toggle.

use std::time::Instant;

use crate::config::DragConfig;
use crate::config::LayoutConfig;
use crate::error::LoadError;
use crate::layout::ColumnLayoutEngine;
use crate::layout::Throttle;
use crate::model::CellValue;
use crate::model::ColumnDescriptor;
use crate::model::Record;
use crate::model::SortDirection;
use crate::model::SortState;
use crate::remote::RemoteLoader;
use crate::remote::RemoteSource;
use crate::remote::ResponseTransform;
use crate::store::TabularStore;

/// One grid instance.
///
/// # Example
///
/// ```
/// use tabula_lib::grid::Grid;
/// use tabula_lib::model::{CellType, CellValue, ColumnDescriptor, Record};
///
/// let columns = vec![
///     ColumnDescriptor::new("name", "Name", CellType::Text).sortable().editable(),
/// ];
/// let rows = ["Bob", "Al"]
///     .into_iter()
///     .map(|name| Record::from([("name".to_string(), CellValue::from(name))]));
///
/// let mut grid = Grid::default();
/// grid.set_container_width(400);
/// grid.initialize(columns, rows);
/// assert!(grid.is_ready());
///
/// grid.toggle_header_sort("name");
/// assert_eq!(grid.visible_rows(), vec![0, 1]);
/// grid.toggle_header_sort("name");
/// assert_eq!(grid.visible_rows(), vec![1, 0]);
/// ```
#[derive(Debug)]
pub struct Grid {
    store: TabularStore,
    layout: ColumnLayoutEngine,
    drag_config: DragConfig,
    throttle: Throttle<f64>,
    container_width: u32,
    is_loading: bool,
    error: Option<String>,
    is_ready: bool,
    all_selected: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), DragConfig::default())
    }
}

impl Grid {
    pub fn new(layout_config: LayoutConfig, drag_config: DragConfig) -> Self {
        Self {
            store: TabularStore::new(),
            layout: ColumnLayoutEngine::new(layout_config),
            drag_config,
            throttle: Throttle::new(drag_config.throttle),
            container_width: 0,
            is_loading: false,
            error: None,
            is_ready: false,
            all_selected: false,
        }
    }

    /// Loads columns and rows, replacing all previous data, and lays the
    /// columns out in the last known container width.
    pub fn initialize(&mut self, columns: Vec<ColumnDescriptor>, rows: impl IntoIterator<Item = Record>) {
        self.store.init(columns, rows);
        self.layout
            .initialize_columns(self.store.columns(), self.container_width);
        self.is_ready = true;
        self.error = None;
        self.refresh_all_selected();
    }

    pub fn store(&self) -> &TabularStore {
        &self.store
    }

    pub fn layout(&self) -> &ColumnLayoutEngine {
        &self.layout
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    pub fn cell_value(&self, row: usize, field: &str) -> Option<&CellValue> {
        self.store.cell_value(row, field)
    }

    pub fn update_cell(&mut self, row: usize, field: &str, value: Option<CellValue>) {
        self.store.update_cell(row, field, value);
        self.refresh_all_selected();
    }

    /// Writes a user edit if the column is editable and its validator, if
    /// any, accepts `raw`. Returns whether the cell was written.
    pub fn commit_edit(&mut self, row: usize, field: &str, raw: &str) -> bool {
        let Some(column) = self.store.column(field) else {
            return false;
        };
        if !column.is_editable {
            log::debug!("commit_edit: '{}' is not editable", field);
            return false;
        }
        if column.validator.as_ref().is_some_and(|v| !v.validate(raw)) {
            log::debug!("commit_edit: rejected value for '{}'", field);
            return false;
        }
        if row >= self.store.row_count() {
            return false;
        }
        self.update_cell(row, field, Some(CellValue::from(raw)));
        true
    }

    /// Cell text as shown to the user, after the column's display transform.
    pub fn display_value(&self, row: usize, field: &str) -> Option<String> {
        let raw = self.store.cell_value(row, field)?.to_string();
        let shown = match self.store.column(field).and_then(|c| c.display_transform.as_ref()) {
            Some(transform) => transform.apply(&raw),
            None => raw,
        };
        Some(shown)
    }

    pub fn visible_rows(&self) -> Vec<usize> {
        self.store.visible_rows()
    }

    pub fn search(&mut self, query: &str) {
        self.store.search(query);
        self.refresh_all_selected();
    }

    pub fn sort_by(&mut self, field: Option<&str>, direction: Option<SortDirection>) {
        self.store.sort(field, direction);
    }

    pub fn sort_state(&self) -> SortState {
        self.store.sort_state()
    }

    /// Header click: sorts descending first, then flips between the two
    /// directions. Returns `false` for columns that are not sortable.
    pub fn toggle_header_sort(&mut self, field: &str) -> bool {
        if !self.store.column(field).is_some_and(|c| c.is_sortable) {
            return false;
        }
        let state = self.store.sort_state();
        let direction = if state.is_sorted_by(field) && state.direction == Some(SortDirection::Dsc) {
            SortDirection::Asc
        } else {
            SortDirection::Dsc
        };
        self.store.sort(Some(field), Some(direction));
        true
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn select_row(&mut self, row: usize, selected: bool) {
        self.store.select_row(row, selected);
        self.refresh_all_selected();
    }

    /// Toggles one row, or with `None` every visible row to the opposite of
    /// [`all_selected`](Self::all_selected).
    pub fn toggle_row_selection(&mut self, row: Option<usize>) {
        match row {
            Some(row) => self.store.toggle_row_selection(row),
            None => self.store.select_all_visible(!self.all_selected),
        }
        self.refresh_all_selected();
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.store.is_selected(row)
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.store.selected_rows()
    }

    fn refresh_all_selected(&mut self) {
        let visible = self.store.visible_rows();
        self.all_selected = !visible.is_empty() && visible.iter().all(|&row| self.store.is_selected(row));
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Records the container width and rescales the columns to it.
    pub fn set_container_width(&mut self, width: u32) {
        self.container_width = width;
        self.layout.update_container_width(width);
    }

    pub fn resize_column(&mut self, field: &str, width: u32) {
        self.layout.resize_column(field, width);
    }

    pub fn update_column_widths(&mut self, field_a: &str, width_a: u32, field_b: &str, width_b: u32) {
        self.layout
            .update_column_widths(field_a, width_a, field_b, width_b);
    }

    pub fn reset_column_widths(&mut self) {
        self.layout.reset_to_initial_sizes();
    }

    /// Starts a border drag between `left` and `right` at pointer `x`.
    pub fn begin_resize(&mut self, left: &str, right: &str, x: f64) -> bool {
        self.throttle.flush();
        self.layout.begin_drag(left, right, x)
    }

    /// Feeds a pointer position, applying it if the throttle window allows.
    pub fn pointer_move(&mut self, x: f64, now: Instant) {
        if !self.layout.is_resizing() {
            return;
        }
        if let Some(x) = self.throttle.offer(x, now) {
            self.layout.drag_to(x);
        }
    }

    /// Applies a deferred pointer position once its window has elapsed.
    pub fn poll_resize(&mut self, now: Instant) {
        if let Some(x) = self.throttle.poll(now) {
            self.layout.drag_to(x);
        }
    }

    /// Applies any deferred pointer position and ends the drag.
    pub fn end_resize(&mut self) {
        if let Some(x) = self.throttle.flush() {
            self.layout.drag_to(x);
        }
        self.layout.end_drag();
    }

    /// Keyboard resize of the border between `left` and `right`.
    pub fn nudge_border(&mut self, left: &str, right: &str, forward: bool, large: bool) {
        let step = if large {
            self.drag_config.keyboard_step_large
        } else {
            self.drag_config.keyboard_step
        };
        let delta = if forward {
            i64::from(step)
        } else {
            -i64::from(step)
        };
        self.layout.nudge_border(left, right, delta);
    }

    pub fn is_resizing(&self) -> bool {
        self.layout.is_resizing()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Applies the outcome of a load. A failure is recorded in
    /// [`error`](Self::error) and leaves the current data untouched.
    pub fn finish_load(&mut self, columns: Vec<ColumnDescriptor>, result: Result<Vec<Record>, LoadError>) {
        match result {
            Ok(rows) => self.initialize(columns, rows),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.is_loading = false;
    }

    /// Fetches rows from `source` and initializes the grid with them.
    ///
    /// Loads are not sequenced: if two overlap, whichever finishes last wins.
    pub async fn load_remote(
        &mut self,
        loader: &RemoteLoader,
        source: &RemoteSource,
        columns: Vec<ColumnDescriptor>,
        transform: Option<&ResponseTransform>,
    ) {
        self.begin_load();
        let result = loader.fetch_rows(source, transform).await;
        self.finish_load(columns, result);
    }
}
