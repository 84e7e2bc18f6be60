//! In-memory tabular grid engine
//!
//! Holds the rows of a data grid with a precomputed search index and per-column
//! sort orders, so searching, sorting and editing stay cheap on large row
//! counts. A companion layout engine keeps column widths summing to the
//! container width under resizing.

pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod model;
pub mod registry;
pub mod remote;
pub mod store;

pub use grid::Grid;
pub use layout::ColumnLayoutEngine;
pub use registry::GridId;
pub use registry::GridRegistry;
pub use store::TabularStore;
