//! Column descriptors

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// How a column's cells are interpreted and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Milliseconds since the epoch, compared numerically.
    Date,
    /// Free text, compared with locale-style ordering.
    #[default]
    Text,
    /// Numeric text, compared numerically.
    Number,
    /// One of a fixed set of options.
    Select,
    /// Boolean checkbox.
    Checkbox,
}

impl CellType {
    /// Whether values of this type sort numerically.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Date)
    }
}

/// Caller-supplied check run by the UI before committing an edit.
#[derive(Clone)]
pub struct CellValidator(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl CellValidator {
    pub fn new(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn validate(&self, raw: &str) -> bool {
        (self.0)(raw)
    }
}

impl fmt::Debug for CellValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellValidator(..)")
    }
}

/// Caller-supplied formatting applied when a cell is displayed.
#[derive(Clone)]
pub struct DisplayTransform(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl DisplayTransform {
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, raw: &str) -> String {
        (self.0)(raw)
    }
}

impl fmt::Debug for DisplayTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DisplayTransform(..)")
    }
}

/// A grid column definition.
///
/// `field_name` is the unique key for the column across the column set.
/// The serialized form uses the same camelCase keys as the JSON column
/// definitions accepted by the CLI.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{CellType, ColumnDescriptor};
///
/// let age = ColumnDescriptor::new("age", "Age", CellType::Number)
///     .sortable()
///     .min_width(60)
///     .flex(1.0);
/// assert!(age.is_sortable);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Unique key of the column.
    pub field_name: String,
    /// Header text.
    pub display_name: String,
    /// Value interpretation.
    #[serde(default)]
    pub cell_type: CellType,
    #[serde(default)]
    pub is_editable: bool,
    #[serde(default)]
    pub is_searchable: bool,
    #[serde(default)]
    pub is_sortable: bool,
    /// The column's boolean cell drives the row's initial selection.
    #[serde(default)]
    pub selects_row: bool,
    /// Explicit starting width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub max_width: Option<u32>,
    /// Relative share of extra or missing width during layout.
    #[serde(default)]
    pub flex: Option<f64>,
    #[serde(skip)]
    pub validator: Option<CellValidator>,
    #[serde(skip)]
    pub display_transform: Option<DisplayTransform>,
}

impl ColumnDescriptor {
    pub fn new(
        field_name: impl Into<String>,
        display_name: impl Into<String>,
        cell_type: CellType,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            display_name: display_name.into(),
            cell_type,
            ..Self::default()
        }
    }

    pub fn editable(mut self) -> Self {
        self.is_editable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.is_searchable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.is_sortable = true;
        self
    }

    pub fn selects_row(mut self) -> Self {
        self.selects_row = true;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn flex(mut self, weight: f64) -> Self {
        self.flex = Some(weight);
        self
    }

    pub fn validator(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(CellValidator::new(f));
        self
    }

    pub fn display_transform(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.display_transform = Some(DisplayTransform::new(f));
        self
    }

    /// Positive flex weight, if any.
    pub fn flex_weight(&self) -> Option<f64> {
        self.flex.filter(|w| *w > 0.0)
    }
}
