//! Precomputed sort orders per sortable column

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::CellType;
use crate::model::CellValue;
use crate::model::SortDirection;

/// Comparable key extracted from one cell.
///
/// Absent cells order before every defined value. Numeric columns order
/// unparsable text after absent cells and before numbers, which keeps the
/// ordering total.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Absent,
    Invalid,
    Number(f64),
    Text { folded: String, raw: String },
}

impl SortKey {
    pub fn new(cell_type: CellType, value: Option<&CellValue>) -> Self {
        let Some(value) = value else {
            return Self::Absent;
        };

        if cell_type.is_numeric() {
            let number = match value {
                CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            };
            match number {
                // Adding 0.0 folds -0 into 0 so the two tie.
                Some(n) => return Self::Number(n + 0.0),
                // Non-numeric dates (ISO strings) keep their text order.
                None if cell_type == CellType::Date => {}
                None => return Self::Invalid,
            }
        }

        let raw = value.to_string();
        Self::Text {
            folded: raw.to_lowercase(),
            raw,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Absent => 0,
            Self::Invalid => 1,
            Self::Number(_) => 2,
            Self::Text { .. } => 3,
        }
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text { folded: fa, raw: ra }, Self::Text { folded: fb, raw: rb }) => {
                locale_cmp(fa, ra, fb, rb)
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Case-insensitive ordering with lowercase before uppercase on ties,
/// approximating the default collation of a UI locale.
fn locale_cmp(folded_a: &str, raw_a: &str, folded_b: &str, raw_b: &str) -> Ordering {
    folded_a.cmp(folded_b).then_with(|| raw_b.cmp(raw_a))
}

/// Ascending and descending orders for one column.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnOrders {
    pub asc: Vec<usize>,
    pub dsc: Vec<usize>,
}

impl ColumnOrders {
    /// Sorts `base` by `key_of`, stable with respect to `base`.
    ///
    /// The descending order is the exact reverse of the ascending order.
    pub fn build(base: &[usize], key_of: impl Fn(usize) -> SortKey) -> Self {
        let mut asc = base.to_vec();
        asc.sort_by_cached_key(|&row| key_of(row));
        let dsc = asc.iter().rev().copied().collect();
        Self { asc, dsc }
    }

    pub fn get(&self, direction: SortDirection) -> &[usize] {
        match direction {
            SortDirection::Asc => &self.asc,
            SortDirection::Dsc => &self.dsc,
        }
    }
}

/// Derived-index table: default order plus per-column sort orders.
///
/// An entry exists for a column iff the column is sortable. A column's
/// entry is recomputed in full whenever that column's data changes.
#[derive(Debug, Default)]
pub(crate) struct SortCache {
    default: Vec<usize>,
    columns: HashMap<String, ColumnOrders>,
}

impl SortCache {
    pub fn new(rows: usize) -> Self {
        Self {
            default: (0..rows).collect(),
            columns: HashMap::new(),
        }
    }

    /// Insertion order.
    pub fn default_order(&self) -> &[usize] {
        &self.default
    }

    /// Rebuilds one column's orders from the default order.
    pub fn rebuild(&mut self, field: &str, key_of: impl Fn(usize) -> SortKey) {
        let orders = ColumnOrders::build(&self.default, key_of);
        log::trace!("sort cache rebuilt for '{}' ({} rows)", field, orders.asc.len());
        self.columns.insert(field.to_string(), orders);
    }

    pub fn get(&self, field: &str, direction: SortDirection) -> Option<&[usize]> {
        self.columns.get(field).map(|orders| orders.get(direction))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }
}
