//! Bidirectional tracking of selectable objects and their collision records
//!
//! The mirror must stay a bijection: every tracked object has exactly one
//! shape and every shape belongs to exactly one object. Both directions are
//! updated through a single insert/remove pair so they cannot drift apart.

use std::collections::HashMap;

use crate::collision::object::CollisionObject;
use crate::physics::ShapeHandle;
use crate::scene::Selectable;

/// Bijective map between selectable objects and collision records
#[derive(Debug, Default)]
pub struct TrackingTable {
    forward: HashMap<Selectable, CollisionObject>,
    reverse: HashMap<ShapeHandle, Selectable>,
}

impl TrackingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an object, returning the record it replaces if one existed
    pub fn insert(&mut self, object: CollisionObject) -> Option<CollisionObject> {
        let previous = self.forward.insert(object.key, object.clone());
        if let Some(prev) = &previous {
            self.reverse.remove(&prev.handle);
        }
        self.reverse.insert(object.handle, object.key);
        previous
    }

    /// Stop tracking an object, returning its record. Removing an untracked
    /// object is a no-op.
    pub fn remove(&mut self, key: Selectable) -> Option<CollisionObject> {
        let record = self.forward.remove(&key)?;
        self.reverse.remove(&record.handle);
        Some(record)
    }

    /// Record of a tracked object
    pub fn get(&self, key: Selectable) -> Option<&CollisionObject> {
        self.forward.get(&key)
    }

    /// True when the object is tracked
    pub fn contains(&self, key: Selectable) -> bool {
        self.forward.contains_key(&key)
    }

    /// Object owning a shape handle
    pub fn key_for(&self, handle: ShapeHandle) -> Option<Selectable> {
        self.reverse.get(&handle).copied()
    }

    /// Number of tracked objects
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True when nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over tracked records
    pub fn iter(&self) -> impl Iterator<Item = &CollisionObject> {
        self.forward.values()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    #[cfg(test)]
    pub(crate) fn reverse_len(&self) -> usize {
        self.reverse.len()
    }
}
