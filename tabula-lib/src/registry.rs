//! Grid registry
//!
//! Hosts own a [`GridRegistry`] and address grids by [`GridId`]. Any number
//! of independent grids can live side by side; disposing one releases its
//! store and layout.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::config::DragConfig;
use crate::config::LayoutConfig;
use crate::error::RegistryError;
use crate::grid::Grid;

/// Identifier of a grid in a [`GridRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridId(String);

impl GridId {
    /// Creates a new unique id of the form `grid-<uuid>`.
    pub fn generate() -> Self {
        Self(format!("grid-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GridId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GridId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Map of live grids.
///
/// New grids are built with the registry's layout and drag configuration.
///
/// # Example
///
/// ```
/// use tabula_lib::registry::GridRegistry;
///
/// let mut registry = GridRegistry::new();
/// let id = registry.create();
/// assert!(id.as_str().starts_with("grid-"));
/// assert!(registry.get(&id).is_some());
///
/// assert!(registry.dispose(&id));
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct GridRegistry {
    grids: HashMap<GridId, Grid>,
    layout_config: LayoutConfig,
    drag_config: DragConfig,
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout_config = config;
        self
    }

    pub fn with_drag_config(mut self, config: DragConfig) -> Self {
        self.drag_config = config;
        self
    }

    /// Registers an empty grid under a freshly generated id.
    pub fn create(&mut self) -> GridId {
        let mut id = GridId::generate();
        while self.grids.contains_key(&id) {
            id = GridId::generate();
        }
        self.grids.insert(id.clone(), self.new_grid());
        log::debug!("grid created: {}", id);
        id
    }

    /// Registers an empty grid under `id`.
    pub fn create_with_id(&mut self, id: impl Into<GridId>) -> Result<&mut Grid, RegistryError> {
        let id = id.into();
        if self.grids.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }
        log::debug!("grid created: {}", id);
        let grid = self.new_grid();
        Ok(self.grids.entry(id).or_insert(grid))
    }

    /// Returns the grid under `id`, creating an empty one if needed.
    pub fn get_or_create(&mut self, id: impl Into<GridId>) -> &mut Grid {
        let (layout_config, drag_config) = (self.layout_config, self.drag_config);
        self.grids
            .entry(id.into())
            .or_insert_with(|| Grid::new(layout_config, drag_config))
    }

    pub fn get(&self, id: &GridId) -> Option<&Grid> {
        self.grids.get(id)
    }

    pub fn get_mut(&mut self, id: &GridId) -> Option<&mut Grid> {
        self.grids.get_mut(id)
    }

    /// Drops the grid under `id`. Returns whether it existed.
    pub fn dispose(&mut self, id: &GridId) -> bool {
        let removed = self.grids.remove(id).is_some();
        if removed {
            log::debug!("grid disposed: {}", id);
        }
        removed
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<GridId> {
        let mut ids: Vec<GridId> = self.grids.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    fn new_grid(&self) -> Grid {
        Grid::new(self.layout_config, self.drag_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let mut registry = GridRegistry::new();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(a.as_str().len(), "grid-".len() + 36);
    }

    #[test]
    fn test_create_with_taken_id_fails() {
        let mut registry = GridRegistry::new();
        registry.create_with_id("people").unwrap();
        let err = registry.create_with_id("people").unwrap_err();
        assert_eq!(err, RegistryError::AlreadyExists(GridId::from("people")));
        assert_eq!(err.to_string(), "Grid already exists: people");
    }

    #[test]
    fn test_get_or_create_reuses_grid() {
        let mut registry = GridRegistry::new();
        registry.get_or_create("a").set_container_width(500);
        registry.get_or_create("a");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.ids(), vec![GridId::from("a")]);
    }
}
