//! Child identity and descriptor types.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a registered child.
///
/// Stable for the lifetime of the child. Identities are handed out by a
/// process-wide counter, so two registries never disagree on what an id means.
/// Ids built with [`ChildId::from_raw`] live in a separate space and never
/// equal an allocated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildId {
    value: u64,
    external: bool,
}

impl ChildId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self {
            value: COUNTER.fetch_add(1, Ordering::SeqCst),
            external: false,
        }
    }

    /// Wrap a raw value supplied by the caller.
    ///
    /// Equal raw values give equal ids, but none of them collides with an id
    /// from [`ChildId::next`].
    pub fn from_raw(raw: u64) -> Self {
        Self {
            value: raw,
            external: true,
        }
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.value
    }

    /// Whether the id came from [`ChildId::from_raw`].
    pub fn is_external(&self) -> bool {
        self.external
    }
}

impl std::fmt::Display for ChildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.external {
            write!(f, "__child_ext_{}", self.value)
        } else {
            write!(f, "__child_{}", self.value)
        }
    }
}

/// Caller-declared ordering position.
///
/// `Unset` covers a binding that never assigned a key. Unset keys sort after
/// every explicit key and keep their registration order among themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderKey {
    At(i64),
    #[default]
    Unset,
}

impl OrderKey {
    /// The explicit key, if one was assigned.
    pub fn value(&self) -> Option<i64> {
        match self {
            OrderKey::At(key) => Some(*key),
            OrderKey::Unset => None,
        }
    }
}

impl From<i64> for OrderKey {
    fn from(key: i64) -> Self {
        OrderKey::At(key)
    }
}

impl From<i32> for OrderKey {
    fn from(key: i32) -> Self {
        OrderKey::At(i64::from(key))
    }
}

impl From<Option<i64>> for OrderKey {
    fn from(key: Option<i64>) -> Self {
        key.map_or(OrderKey::Unset, OrderKey::At)
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        match (self, other) {
            (OrderKey::At(a), OrderKey::At(b)) => a.cmp(b),
            (OrderKey::At(_), OrderKey::Unset) => CmpOrdering::Less,
            (OrderKey::Unset, OrderKey::At(_)) => CmpOrdering::Greater,
            (OrderKey::Unset, OrderKey::Unset) => CmpOrdering::Equal,
        }
    }
}

/// One registered child.
///
/// Immutable once created. A changed order key travels as a new registration
/// under the same identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildDescriptor<H> {
    pub id: ChildId,
    pub order_key: OrderKey,
    /// Owned by the rendering collaborator; only referenced here.
    pub handle: H,
}

impl<H> ChildDescriptor<H> {
    pub fn new(id: ChildId, order_key: impl Into<OrderKey>, handle: H) -> Self {
        Self {
            id,
            order_key: order_key.into(),
            handle,
        }
    }
}

/// Inbound notification payloads emitted by descendants.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<H> {
    /// A descendant became active.
    Register(ChildDescriptor<H>),
    /// A descendant became inactive.
    Unregister(ChildId),
}

impl<H> Notification<H> {
    /// Identity the notification refers to.
    pub fn child_id(&self) -> ChildId {
        match self {
            Notification::Register(descriptor) => descriptor.id,
            Notification::Unregister(id) => *id,
        }
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Register(_) => "register",
            Notification::Unregister(_) => "unregister",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_sorts_after_explicit_keys() {
        let mut keys = vec![OrderKey::Unset, OrderKey::At(3), OrderKey::At(-7)];
        keys.sort();
        assert_eq!(keys, vec![OrderKey::At(-7), OrderKey::At(3), OrderKey::Unset]);
    }

    #[test]
    fn test_child_ids_are_unique() {
        let a = ChildId::next();
        let b = ChildId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_raw_ids_never_collide_with_allocated_ids() {
        let allocated = ChildId::next();
        let raw = ChildId::from_raw(allocated.raw());

        assert_ne!(raw, allocated);
        assert_eq!(raw, ChildId::from_raw(allocated.raw()));
        assert!(raw.is_external());
        assert!(!allocated.is_external());
        assert_ne!(raw.to_string(), allocated.to_string());
    }
}
