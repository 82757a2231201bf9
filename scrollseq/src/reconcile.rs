//! Sequence reconciliation.
//!
//! Turns a registry snapshot into the sequence the scroller displays:
//! 1. Stable sort by order key (ties keep registration order)
//! 2. Map every descriptor to its render handle
//! 3. Attach the start position on the first non-empty rebuild only

use log::{debug, warn};

use crate::child::ChildDescriptor;
use crate::registry::ChildRegistry;
use crate::sequence::{Publish, Sequence};

/// Rebuilds sequences for one scroll view.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    /// Read once at creation, consumed by the first rebuild with any items.
    start_position: Option<usize>,
    /// Number of rebuilds performed so far.
    rebuilds: u64,
}

impl Reconciler {
    pub fn new(start_position: Option<usize>) -> Self {
        Self {
            start_position,
            rebuilds: 0,
        }
    }

    /// Rebuild the sequence from the registry's current contents.
    ///
    /// An empty sequence has nothing to position, so the start position
    /// waits for the first rebuild that has items.
    pub fn rebuild<H: Clone>(&mut self, registry: &ChildRegistry<H>) -> Publish<H> {
        let sequence = order(registry.snapshot());

        let start_index = if sequence.is_empty() {
            None
        } else {
            self.start_position.take()
        };
        self.rebuilds += 1;

        if let Some(index) = start_index {
            if index >= sequence.len() {
                warn!(
                    "Start position {} is past the end of a {}-item sequence",
                    index,
                    sequence.len()
                );
            }
        }

        debug!(
            "Rebuild #{} produced {} items (start index: {:?})",
            self.rebuilds,
            sequence.len(),
            start_index
        );

        Publish {
            sequence,
            start_index,
        }
    }

    /// Whether the first rebuild has already happened.
    pub fn has_rebuilt(&self) -> bool {
        self.rebuilds > 0
    }

    /// Start position not yet handed to the scroller.
    pub fn pending_start(&self) -> Option<usize> {
        self.start_position
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

/// Order descriptors by key and collect their handles.
///
/// `sort_by_key` is stable, so equal keys keep snapshot order.
pub fn order<H: Clone>(snapshot: &[ChildDescriptor<H>]) -> Sequence<H> {
    let mut sorted: Vec<&ChildDescriptor<H>> = snapshot.iter().collect();
    sorted.sort_by_key(|descriptor| descriptor.order_key);
    sorted.into_iter().map(|descriptor| descriptor.handle.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::child::{ChildId, OrderKey};

    fn registry(entries: &[(u64, OrderKey, &'static str)]) -> ChildRegistry<&'static str> {
        let mut registry = ChildRegistry::new();
        for (raw, key, handle) in entries {
            registry.insert(ChildDescriptor::new(ChildId::from_raw(*raw), *key, *handle));
        }
        registry
    }

    #[test]
    fn test_equal_keys_keep_registration_order() {
        let registry = registry(&[
            (1, OrderKey::At(1), "a"),
            (2, OrderKey::At(0), "b"),
            (3, OrderKey::At(0), "c"),
        ]);

        let publish = Reconciler::new(None).rebuild(&registry);
        assert_eq!(publish.sequence.handles(), &["b", "c", "a"]);
    }

    #[test]
    fn test_unset_keys_trail() {
        let registry = registry(&[
            (1, OrderKey::Unset, "x"),
            (2, OrderKey::At(10), "y"),
            (3, OrderKey::Unset, "z"),
            (4, OrderKey::At(-1), "w"),
        ]);

        let publish = Reconciler::new(None).rebuild(&registry);
        assert_eq!(publish.sequence.handles(), &["w", "y", "x", "z"]);
    }

    #[test]
    fn test_start_position_only_on_first_rebuild() {
        let registry = registry(&[
            (1, OrderKey::At(0), "a"),
            (2, OrderKey::At(1), "b"),
            (3, OrderKey::At(2), "c"),
        ]);
        let mut reconciler = Reconciler::new(Some(2));

        assert_eq!(reconciler.rebuild(&registry).start_index, Some(2));
        assert_eq!(reconciler.rebuild(&registry).start_index, None);
        assert_eq!(reconciler.rebuild_count(), 2);
    }

    #[test]
    fn test_empty_registry_publishes_empty_sequence() {
        let registry: ChildRegistry<&str> = ChildRegistry::new();
        let publish = Reconciler::new(None).rebuild(&registry);
        assert!(publish.sequence.is_empty());
        assert_eq!(publish.start_index, None);
    }

    #[test]
    fn test_empty_rebuild_keeps_start_position() {
        let empty: ChildRegistry<&str> = ChildRegistry::new();
        let filled = registry(&[(1, OrderKey::At(0), "a"), (2, OrderKey::At(1), "b")]);
        let mut reconciler = Reconciler::new(Some(1));

        assert_eq!(reconciler.rebuild(&empty).start_index, None);
        assert_eq!(reconciler.pending_start(), Some(1));

        assert_eq!(reconciler.rebuild(&filled).start_index, Some(1));
        assert_eq!(reconciler.pending_start(), None);
        assert_eq!(reconciler.rebuild(&filled).start_index, None);
    }
}
