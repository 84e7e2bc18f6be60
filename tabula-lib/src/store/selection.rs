//! Row selection state

use std::collections::BTreeMap;

/// Per-row selection flags, independent of search and sort state.
///
/// Every row in the index space has an entry after initialization, so a
/// row that was never touched reads as explicitly unselected.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelectionSet {
    rows: BTreeMap<usize, bool>,
}

impl SelectionSet {
    pub fn set(&mut self, row: usize, selected: bool) {
        self.rows.insert(row, selected);
    }

    /// Flips a row's flag and returns the new value.
    pub fn toggle(&mut self, row: usize) -> bool {
        let flag = self.rows.entry(row).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.rows.get(&row).copied().unwrap_or(false)
    }

    /// Sets every row in `rows` to `selected`.
    pub fn set_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a usize>, selected: bool) {
        for &row in rows {
            self.rows.insert(row, selected);
        }
    }

    /// Selected rows in ascending row order.
    pub fn selected(&self) -> Vec<usize> {
        self.rows
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(row, _)| *row)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::default();
        assert!(selection.toggle(3));
        assert!(selection.is_selected(3));
        assert!(!selection.toggle(3));
        assert!(!selection.is_selected(3));
    }

    #[test]
    fn test_set_all_only_touches_given_rows() {
        let mut selection = SelectionSet::default();
        selection.set(0, true);
        selection.set_all(&[2, 4], true);
        selection.set_all(&[0], false);
        assert_eq!(selection.selected(), vec![2, 4]);
    }
}
