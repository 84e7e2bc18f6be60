//! Integration tests for the grid facade and registry.

use std::time::{Duration, Instant};

use tabula_lib::config::{DragConfig, LayoutConfig};
use tabula_lib::grid::Grid;
use tabula_lib::model::{CellType, CellValue, ColumnDescriptor, Record, SortDirection};
use tabula_lib::registry::{GridId, GridRegistry};

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name", CellType::Text)
            .searchable()
            .sortable()
            .editable(),
        ColumnDescriptor::new("age", "Age", CellType::Number)
            .sortable()
            .editable()
            .validator(|raw| raw.parse::<u32>().is_ok())
            .display_transform(|raw| format!("{} yrs", raw)),
        ColumnDescriptor::new("id", "Id", CellType::Text),
    ]
}

fn rows() -> Vec<Record> {
    [("Bob", "30", "b"), ("Al", "40", "a"), ("Cy", "20", "c")]
        .into_iter()
        .map(|(name, age, id)| {
            Record::from([
                ("name".to_string(), CellValue::from(name)),
                ("age".to_string(), CellValue::from(age)),
                ("id".to_string(), CellValue::from(id)),
            ])
        })
        .collect()
}

fn grid() -> Grid {
    let mut grid = Grid::default();
    grid.set_container_width(600);
    grid.initialize(columns(), rows());
    grid
}

// =============================================================================
// Editing
// =============================================================================

#[test]
fn test_commit_edit_runs_validator() {
    let mut grid = grid();
    assert!(!grid.commit_edit(0, "age", "thirty"));
    assert_eq!(grid.cell_value(0, "age"), Some(&CellValue::from("30")));

    assert!(grid.commit_edit(0, "age", "31"));
    assert_eq!(grid.cell_value(0, "age"), Some(&CellValue::from("31")));
}

#[test]
fn test_commit_edit_rejects_read_only_and_unknown() {
    let mut grid = grid();
    assert!(!grid.commit_edit(0, "id", "z"));
    assert!(!grid.commit_edit(0, "missing", "z"));
    assert!(!grid.commit_edit(7, "name", "z"));
    assert_eq!(grid.cell_value(0, "id"), Some(&CellValue::from("b")));
}

#[test]
fn test_update_cell_skips_validator() {
    let mut grid = grid();
    grid.update_cell(1, "age", Some(CellValue::from("unknown")));
    assert_eq!(grid.cell_value(1, "age"), Some(&CellValue::from("unknown")));
}

#[test]
fn test_display_value_applies_transform() {
    let grid = grid();
    assert_eq!(grid.display_value(2, "age").as_deref(), Some("20 yrs"));
    assert_eq!(grid.display_value(2, "name").as_deref(), Some("Cy"));
    assert_eq!(grid.display_value(9, "name"), None);
}

// =============================================================================
// Sorting and selection
// =============================================================================

#[test]
fn test_header_sort_cycle() {
    let mut grid = grid();
    assert!(grid.toggle_header_sort("age"));
    assert_eq!(grid.sort_state().direction, Some(SortDirection::Dsc));
    assert_eq!(grid.visible_rows(), vec![1, 0, 2]);

    grid.toggle_header_sort("age");
    assert_eq!(grid.sort_state().direction, Some(SortDirection::Asc));
    assert_eq!(grid.visible_rows(), vec![2, 0, 1]);

    grid.toggle_header_sort("age");
    assert_eq!(grid.sort_state().direction, Some(SortDirection::Dsc));

    grid.toggle_header_sort("name");
    assert_eq!(grid.sort_state().direction, Some(SortDirection::Dsc));
    assert!(!grid.toggle_header_sort("id"));
    assert!(grid.sort_state().is_sorted_by("name"));
}

#[test]
fn test_all_selected_follows_view() {
    let mut grid = grid();
    grid.search("a");
    grid.toggle_row_selection(None);
    assert_eq!(grid.selected_rows(), vec![1]);
    assert!(grid.all_selected());

    grid.search("");
    assert!(!grid.all_selected());
    grid.toggle_row_selection(Some(0));
    grid.toggle_row_selection(Some(2));
    assert!(grid.all_selected());

    grid.toggle_row_selection(None);
    assert!(grid.selected_rows().is_empty());
}

// =============================================================================
// Resizing
// =============================================================================

#[test]
fn test_initialize_uses_known_container_width() {
    let grid = grid();
    assert_eq!(grid.layout().widths().iter().map(|(_, w)| w).sum::<u32>(), 600);
    assert_eq!(grid.layout().column_width("name"), 200);
}

#[test]
fn test_throttled_drag_settles_on_last_position() {
    let mut grid = Grid::new(
        LayoutConfig::default(),
        DragConfig::default().with_throttle(Duration::from_millis(50)),
    );
    grid.set_container_width(600);
    grid.initialize(columns(), rows());
    let t0 = Instant::now();

    assert!(grid.begin_resize("name", "age", 0.0));
    assert!(grid.is_resizing());
    grid.pointer_move(10.0, t0);
    assert_eq!(grid.layout().column_width("name"), 210);

    grid.pointer_move(20.0, t0 + Duration::from_millis(10));
    grid.pointer_move(30.0, t0 + Duration::from_millis(20));
    assert_eq!(grid.layout().column_width("name"), 210);

    grid.poll_resize(t0 + Duration::from_millis(60));
    assert_eq!(grid.layout().column_width("name"), 230);

    grid.pointer_move(-40.0, t0 + Duration::from_millis(70));
    grid.end_resize();
    assert!(!grid.is_resizing());
    assert_eq!(grid.layout().column_width("name"), 160);
    assert_eq!(grid.layout().column_width("age"), 240);
}

#[test]
fn test_container_and_reset() {
    let mut grid = grid();
    grid.resize_column("name", 300);
    grid.set_container_width(1200);
    assert_eq!(grid.layout().column_width("name"), 600);

    grid.reset_column_widths();
    assert_eq!(grid.layout().column_width("name"), 400);
    assert_eq!(grid.layout().track_sizes(), "400px 400px 400px");
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_registry_keeps_grids_independent() {
    let mut registry = GridRegistry::new();
    let a = registry.create();
    let b = registry.create();

    registry.get_mut(&a).unwrap().initialize(columns(), rows());
    registry.get_mut(&b).unwrap().initialize(columns(), Vec::new());
    registry.get_mut(&a).unwrap().search("bob");

    assert_eq!(registry.get(&a).unwrap().visible_rows(), vec![0]);
    assert!(registry.get(&b).unwrap().visible_rows().is_empty());

    assert!(registry.dispose(&a));
    assert!(!registry.dispose(&a));
    assert!(registry.get(&a).is_none());
    assert_eq!(registry.ids(), vec![b]);
}

#[test]
fn test_registry_applies_configs() {
    let mut registry =
        GridRegistry::new().with_layout_config(LayoutConfig::default().with_default_width(100));
    let grid = registry.get_or_create(GridId::from("people"));
    grid.set_container_width(300);
    grid.initialize(columns(), rows());
    assert_eq!(grid.layout().column_width("name"), 100);
}
