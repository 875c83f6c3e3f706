//! Named storage for scene structures.

use std::collections::BTreeMap;

use crate::error::{CalibscopeError, Result};
use crate::structure::Structure;

type ByName = BTreeMap<String, Box<dyn Structure>>;

/// Structures keyed by type name, then by instance name.
///
/// Names are unique within a type; a camera glyph and a point set may share
/// a name.
#[derive(Default)]
pub struct Registry {
    by_type: BTreeMap<&'static str, ByName>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a structure, failing with `StructureExists` if the type already
    /// holds one with the same name.
    pub fn register(&mut self, structure: Box<dyn Structure>) -> Result<()> {
        let slot = self.by_type.entry(structure.type_name()).or_default();
        if slot.contains_key(structure.name()) {
            return Err(CalibscopeError::StructureExists(structure.name().to_string()));
        }
        slot.insert(structure.name().to_string(), structure);
        Ok(())
    }

    /// Adds a structure, returning the one it displaced.
    pub fn replace(&mut self, structure: Box<dyn Structure>) -> Option<Box<dyn Structure>> {
        self.by_type
            .entry(structure.type_name())
            .or_default()
            .insert(structure.name().to_string(), structure)
    }

    pub fn get(&self, type_name: &str, name: &str) -> Option<&dyn Structure> {
        self.by_type.get(type_name)?.get(name).map(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, type_name: &str, name: &str) -> Option<&mut Box<dyn Structure>> {
        self.by_type.get_mut(type_name)?.get_mut(name)
    }

    pub fn contains(&self, type_name: &str, name: &str) -> bool {
        self.get(type_name, name).is_some()
    }

    /// Removes and returns a structure. Empty type slots are dropped.
    pub fn remove(&mut self, type_name: &str, name: &str) -> Option<Box<dyn Structure>> {
        let slot = self.by_type.get_mut(type_name)?;
        let removed = slot.remove(name);
        if slot.is_empty() {
            self.by_type.remove(type_name);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.by_type.clear();
    }

    /// All structures, ordered by type name and then by name.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Structure> {
        self.by_type
            .values()
            .flat_map(BTreeMap::values)
            .map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Sorted names of the structures of one type.
    pub fn names_of_type(&self, type_name: &str) -> Vec<String> {
        self.by_type
            .get(type_name)
            .map(|slot| slot.keys().cloned().collect())
            .unwrap_or_default()
    }
}
