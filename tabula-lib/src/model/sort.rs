//! Sort direction and state

use serde::Deserialize;
use serde::Serialize;

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Dsc,
}

impl SortDirection {
    /// Parses `"asc"` or `"dsc"` (also accepts `"desc"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "dsc" | "desc" => Some(Self::Dsc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Dsc => "dsc",
        }
    }
}

/// The active sort key of a store.
///
/// Both fields are `None` when rows are in their default (insertion) order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Whether `field` is the active sort key.
    pub fn is_sorted_by(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field)
    }
}
