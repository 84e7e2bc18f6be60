//! Per-row search text index

use std::collections::HashSet;

/// One row's searchable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchEntry {
    pub row: usize,
    /// Lowercased concatenation of the row's searchable cells.
    pub text: String,
}

/// Search entries for every row, kept in row-index order.
///
/// Each row owns exactly one entry. Replacing an entry is O(1) because the
/// row index is the position in the table.
#[derive(Debug, Default)]
pub(crate) struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            entries: Vec::with_capacity(rows),
        }
    }

    /// Appends the entry for the next row.
    pub fn push(&mut self, text: String) {
        let row = self.entries.len();
        self.entries.push(SearchEntry { row, text });
    }

    /// Replaces a row's entry. Unknown rows are ignored.
    pub fn replace(&mut self, row: usize, text: String) {
        if let Some(entry) = self.entries.get_mut(row) {
            entry.text = text;
        }
    }

    /// Rows whose entry contains `needle`.
    ///
    /// `needle` must already be trimmed and lowercased.
    pub fn matches(&self, needle: &str) -> HashSet<usize> {
        self.entries
            .iter()
            .filter(|entry| entry.text.contains(needle))
            .map(|entry| entry.row)
            .collect()
    }

    #[cfg(test)]
    pub fn entry(&self, row: usize) -> Option<&SearchEntry> {
        self.entries.get(row)
    }
}

/// Normalizes a user query: trimmed and lowercased.
pub(crate) fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
