//! Integration tests for the tabular store.

use tabula_lib::model::{CellType, CellValue, ColumnDescriptor, Record, SortDirection, SortState};
use tabula_lib::store::TabularStore;

fn people_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name", CellType::Text)
            .searchable()
            .sortable()
            .editable(),
        ColumnDescriptor::new("age", "Age", CellType::Number).sortable(),
        ColumnDescriptor::new("city", "City", CellType::Text).searchable(),
    ]
}

fn person(name: &str, age: &str, city: &str) -> Record {
    Record::from([
        ("name".to_string(), CellValue::from(name)),
        ("age".to_string(), CellValue::from(age)),
        ("city".to_string(), CellValue::from(city)),
    ])
}

fn people() -> TabularStore {
    let mut store = TabularStore::new();
    store.init(
        people_columns(),
        vec![
            person("Bob", "30", "Oslo"),
            person("Al", "40", "Lima"),
            person("Cy", "20", "Salem"),
            person("dee", "9", "Oslo"),
        ],
    );
    store
}

// =============================================================================
// Init
// =============================================================================

#[test]
fn test_init_visible_is_identity() {
    let store = people();
    assert_eq!(store.visible_rows(), vec![0, 1, 2, 3]);
    assert_eq!(store.row_count(), 4);
    assert_eq!(store.sort_state(), SortState::default());
}

#[test]
fn test_init_empty_dataset() {
    let mut store = TabularStore::new();
    store.init(people_columns(), Vec::new());
    assert!(store.visible_rows().is_empty());
    store.sort(Some("age"), Some(SortDirection::Asc));
    store.search("x");
    assert!(store.visible_rows().is_empty());
}

#[test]
fn test_reinit_replaces_state() {
    let mut store = people();
    store.search("oslo");
    store.sort(Some("age"), Some(SortDirection::Dsc));
    store.select_row(1, true);

    store.init(people_columns(), vec![person("Ed", "1", "Rome")]);
    assert_eq!(store.visible_rows(), vec![0]);
    assert_eq!(store.search_query(), "");
    assert!(store.selected_rows().is_empty());
    assert_eq!(store.sort_state(), SortState::default());
}

// =============================================================================
// Cells
// =============================================================================

#[test]
fn test_unknown_lookups_are_absent() {
    let mut store = people();
    assert_eq!(store.cell_value(0, "name"), Some(&CellValue::from("Bob")));
    assert_eq!(store.cell_value(99, "name"), None);
    assert_eq!(store.cell_value(0, "missing"), None);

    store.update_cell(99, "name", Some(CellValue::from("x")));
    store.update_cell(0, "missing", Some(CellValue::from("x")));
    assert_eq!(store.row_data(0).len(), 3);
    assert!(store.row_data(99).is_empty());
}

#[test]
fn test_update_cell_clears_value() {
    let mut store = people();
    store.update_cell(0, "city", None);
    assert_eq!(store.cell_value(0, "city"), None);
    assert!(!store.row_data(0).contains_key("city"));
}

// =============================================================================
// Sort
// =============================================================================

#[test]
fn test_scenario_sort_then_search() {
    let mut store = TabularStore::new();
    store.init(
        vec![
            ColumnDescriptor::new("name", "Name", CellType::Text)
                .sortable()
                .searchable(),
            ColumnDescriptor::new("age", "Age", CellType::Number).sortable(),
        ],
        [("Bob", "30"), ("Al", "40"), ("Cy", "20")].map(|(name, age)| {
            Record::from([
                ("name".to_string(), CellValue::from(name)),
                ("age".to_string(), CellValue::from(age)),
            ])
        }),
    );

    store.sort(Some("age"), Some(SortDirection::Asc));
    assert_eq!(store.visible_rows(), vec![2, 0, 1]);

    store.search("al");
    assert_eq!(store.visible_rows(), vec![1]);
}

#[test]
fn test_descending_is_reverse_of_ascending() {
    let mut store = people();
    for field in ["name", "age"] {
        store.sort(Some(field), Some(SortDirection::Asc));
        let mut asc = store.visible_rows();
        store.sort(Some(field), Some(SortDirection::Dsc));
        asc.reverse();
        assert_eq!(store.visible_rows(), asc, "field {}", field);
    }
}

#[test]
fn test_numeric_sort_is_not_lexicographic() {
    let mut store = people();
    store.sort(Some("age"), Some(SortDirection::Asc));
    assert_eq!(store.visible_rows(), vec![3, 2, 0, 1]);
}

#[test]
fn test_text_sort_ignores_case() {
    let mut store = people();
    store.sort(Some("name"), Some(SortDirection::Asc));
    assert_eq!(store.visible_rows(), vec![1, 0, 2, 3]);
}

#[test]
fn test_absent_sorts_first() {
    let mut store = people();
    store.update_cell(1, "age", None);
    store.sort(Some("age"), Some(SortDirection::Asc));
    assert_eq!(store.visible_rows()[0], 1);
}

#[test]
fn test_sort_unknown_or_unsortable_is_noop() {
    let mut store = people();
    store.sort(Some("age"), Some(SortDirection::Asc));
    let before = store.visible_rows();

    store.sort(Some("city"), Some(SortDirection::Asc));
    store.sort(Some("missing"), Some(SortDirection::Dsc));
    assert_eq!(store.visible_rows(), before);
    assert!(store.sort_state().is_sorted_by("age"));
}

#[test]
fn test_sort_none_restores_default_order() {
    let mut store = people();
    store.sort(Some("age"), Some(SortDirection::Asc));
    store.sort(Some("age"), None);
    assert_eq!(store.visible_rows(), vec![0, 1, 2, 3]);
    assert_eq!(store.sort_state(), SortState::default());
}

#[test]
fn test_edit_on_active_sort_column_resorts() {
    let mut store = people();
    store.sort(Some("age"), Some(SortDirection::Asc));
    store.update_cell(1, "age", Some(CellValue::from("1")));
    assert_eq!(store.visible_rows(), vec![1, 3, 2, 0]);

    store.sort(Some("age"), Some(SortDirection::Dsc));
    assert_eq!(store.visible_rows(), vec![0, 2, 3, 1]);
}

#[test]
fn test_edit_on_inactive_sort_column_refreshes_cache() {
    let mut store = people();
    store.sort(Some("name"), Some(SortDirection::Asc));
    store.update_cell(0, "age", Some(CellValue::from("100")));
    assert_eq!(store.visible_rows(), vec![1, 0, 2, 3]);

    store.sort(Some("age"), Some(SortDirection::Dsc));
    assert_eq!(store.visible_rows()[0], 0);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_then_clear_restores_sequence() {
    let mut store = people();
    store.sort(Some("name"), Some(SortDirection::Dsc));
    let before = store.visible_rows();

    store.search("oslo");
    assert_eq!(store.visible_rows(), vec![3, 0]);
    store.search("   ");
    assert_eq!(store.visible_rows(), before);
}

#[test]
fn test_search_is_trimmed_and_case_insensitive() {
    let mut store = people();
    store.search("  SALEM ");
    assert_eq!(store.visible_rows(), vec![2]);
    assert_eq!(store.search_query(), "salem");
}

#[test]
fn test_search_ignores_non_searchable_columns() {
    let mut store = people();
    store.search("40");
    assert!(store.visible_rows().is_empty());
}

#[test]
fn test_search_digits_do_not_match_row_index() {
    let mut store = people();
    store.search("2");
    assert!(store.visible_rows().is_empty());
}

#[test]
fn test_search_tracks_edits() {
    let mut store = people();
    store.search("bob");
    assert_eq!(store.visible_rows(), vec![0]);

    store.update_cell(0, "name", Some(CellValue::from("Rob")));
    assert!(store.visible_rows().is_empty());

    store.search("rob");
    assert_eq!(store.visible_rows(), vec![0]);
    store.search("bob");
    assert!(store.visible_rows().is_empty());
}

#[test]
fn test_search_preserves_active_sort() {
    let mut store = people();
    store.sort(Some("age"), Some(SortDirection::Dsc));
    store.search("o");
    assert_eq!(store.visible_rows(), vec![0, 3]);

    store.sort(Some("age"), Some(SortDirection::Asc));
    assert_eq!(store.visible_rows(), vec![3, 0]);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_select_all_visible_respects_filter() {
    let mut store = people();
    store.select_row(1, true);
    store.search("oslo");
    store.select_all_visible(true);
    assert_eq!(store.selected_rows(), vec![0, 1, 3]);

    store.select_all_visible(false);
    assert_eq!(store.selected_rows(), vec![1]);
}

#[test]
fn test_toggle_and_out_of_range_selection() {
    let mut store = people();
    store.toggle_row_selection(2);
    assert!(store.is_selected(2));
    store.toggle_row_selection(2);
    assert!(!store.is_selected(2));

    store.select_row(42, true);
    store.toggle_row_selection(42);
    assert!(store.selected_rows().is_empty());
}

#[test]
fn test_snapshots_are_independent() {
    let mut store = people();
    let visible = store.visible_rows();
    let selected = store.selected_rows();
    store.search("lima");
    store.select_row(0, true);
    assert_eq!(visible, vec![0, 1, 2, 3]);
    assert!(selected.is_empty());
}

#[test]
fn test_initial_selection_from_selecting_column() {
    let mut store = TabularStore::new();
    store.init(
        vec![ColumnDescriptor::new("done", "Done", CellType::Checkbox).selects_row()],
        vec![
            Record::from([("done".to_string(), CellValue::from(true))]),
            Record::from([("done".to_string(), CellValue::from(false))]),
            Record::new(),
            Record::from([("done".to_string(), CellValue::from("TRUE"))]),
        ],
    );
    assert_eq!(store.selected_rows(), vec![0, 3]);
}
