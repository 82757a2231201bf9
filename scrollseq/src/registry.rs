//! Child registry for one scroll view.

use log::{debug, warn};

use crate::child::{ChildDescriptor, ChildId};

/// Result of inserting a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The identity was new.
    Inserted,
    /// The identity was already present and its descriptor was overwritten.
    Replaced,
}

/// Registry of the children currently registered with one scroll view.
///
/// The registry tracks:
/// - One descriptor per identity (last writer wins)
/// - The order in which identities were first registered, which the
///   reconciler uses to break ties between equal order keys
///
/// It never orders anything itself.
#[derive(Debug, Clone)]
pub struct ChildRegistry<H> {
    /// Descriptors in first-registration order.
    entries: Vec<ChildDescriptor<H>>,
}

impl<H> Default for ChildRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ChildRegistry<H> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace the descriptor for `descriptor.id`.
    ///
    /// A replaced descriptor keeps the slot of the original registration.
    pub fn insert(&mut self, descriptor: ChildDescriptor<H>) -> InsertOutcome {
        let id = descriptor.id;
        match self.position(id) {
            Some(index) => {
                debug!(
                    "Re-registering {} with order key {:?}",
                    id, descriptor.order_key
                );
                self.entries[index] = descriptor;
                InsertOutcome::Replaced
            }
            None => {
                debug!("Registering {} with order key {:?}", id, descriptor.order_key);
                self.entries.push(descriptor);
                InsertOutcome::Inserted
            }
        }
    }

    /// Delete the descriptor for `id` if present.
    ///
    /// Removing an unknown identity is a no-op, but it is logged because a
    /// well-behaved descendant only unregisters after registering.
    pub fn remove(&mut self, id: ChildId) -> Option<ChildDescriptor<H>> {
        let Some(index) = self.position(id) else {
            warn!("Unregister for unknown child {}", id);
            return None;
        };

        debug!("Unregistering {}", id);
        Some(self.entries.remove(index))
    }

    /// Current descriptors, in registration order.
    pub fn snapshot(&self) -> &[ChildDescriptor<H>] {
        &self.entries
    }

    /// Look up a descriptor by identity.
    pub fn get(&self, id: ChildId) -> Option<&ChildDescriptor<H>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: ChildId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: ChildId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::child::OrderKey;

    fn descriptor(raw: u64, key: i64, handle: &'static str) -> ChildDescriptor<&'static str> {
        ChildDescriptor::new(ChildId::from_raw(raw), key, handle)
    }

    #[test]
    fn test_insert_then_snapshot_keeps_registration_order() {
        let mut registry = ChildRegistry::new();
        registry.insert(descriptor(1, 5, "a"));
        registry.insert(descriptor(2, 0, "b"));

        let handles: Vec<_> = registry.snapshot().iter().map(|d| d.handle).collect();
        assert_eq!(handles, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_insert_overwrites_in_place() {
        let mut registry = ChildRegistry::new();
        assert_eq!(registry.insert(descriptor(1, 0, "a")), InsertOutcome::Inserted);
        registry.insert(descriptor(2, 0, "b"));
        assert_eq!(registry.insert(descriptor(1, 9, "a2")), InsertOutcome::Replaced);

        assert_eq!(registry.len(), 2);
        let first = &registry.snapshot()[0];
        assert_eq!(first.handle, "a2");
        assert_eq!(first.order_key, OrderKey::At(9));
    }

    #[test]
    fn test_raw_id_does_not_overwrite_allocated_child() {
        let mut registry = ChildRegistry::new();
        let allocated = ChildId::next();
        registry.insert(ChildDescriptor::new(allocated, 0, "allocated"));

        let outcome = registry.insert(descriptor(allocated.raw(), 0, "raw"));
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(allocated).map(|d| d.handle), Some("allocated"));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = ChildRegistry::new();
        registry.insert(descriptor(1, 0, "a"));

        assert!(registry.remove(ChildId::from_raw(42)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_returns_descriptor() {
        let mut registry = ChildRegistry::new();
        registry.insert(descriptor(1, 0, "a"));

        let removed = registry.remove(ChildId::from_raw(1));
        assert_eq!(removed.map(|d| d.handle), Some("a"));
        assert!(registry.is_empty());
    }
}
