//! Cell values and row records

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A single cell value.
///
/// Cells hold either text or a boolean. A cell with no value is represented
/// as `None` wherever a `CellValue` is looked up, never as an error.
///
/// Numbers and dates are carried as text (dates as milliseconds since the
/// epoch) and interpreted by the column's [`CellType`](super::CellType) when
/// sorting.
///
/// # Example
///
/// ```
/// use tabula_lib::model::CellValue;
///
/// let name = CellValue::from("Contoso");
/// let active = CellValue::from(true);
/// assert_eq!(name.as_text(), Some("Contoso"));
/// assert_eq!(active.as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Boolean value (checkbox cells).
    Bool(bool),
    /// Text value.
    Text(String),
}

impl CellValue {
    /// Converts a JSON value into a cell value.
    ///
    /// `null` becomes `None`. Numbers keep their JSON rendering, arrays and
    /// objects are stored as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => Some(Self::Text(n.to_string())),
            other => Some(Self::Text(other.to_string())),
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// Whether this value counts as "on" for row-selecting columns.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Text(n.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Text(n.to_string())
    }
}

/// One input row: a field-keyed map of cell values.
///
/// Fields missing from the map are absent cells.
pub type Record = HashMap<String, CellValue>;

/// Converts a JSON object into a [`Record`], dropping `null` fields.
pub fn record_from_json(object: &serde_json::Map<String, serde_json::Value>) -> Record {
    object
        .iter()
        .filter_map(|(key, value)| CellValue::from_json(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Converts a JSON array of objects into records.
///
/// Returns `None` if the value is not an array or any element is not an object.
pub fn records_from_json(value: &serde_json::Value) -> Option<Vec<Record>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_object().map(record_from_json))
        .collect()
}
