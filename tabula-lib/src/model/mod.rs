//! Grid data model
//!
//! Types shared by the store, the layout engine and the remote loader.

mod column;
mod sort;
mod value;

pub use column::*;
pub use sort::*;
pub use value::*;
