//! Registry error types

use crate::registry::GridId;

/// Errors from [`GridRegistry`](crate::registry::GridRegistry) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A grid is already registered under this id.
    #[error("Grid already exists: {0}")]
    AlreadyExists(GridId),
}
