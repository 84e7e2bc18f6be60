//! Error types

mod load;
mod registry;

pub use load::*;
pub use registry::*;
