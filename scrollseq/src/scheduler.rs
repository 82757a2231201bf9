//! Deferred rebuild scheduling.
//!
//! Mount and unmount notifications do not rebuild immediately: a binding may
//! still re-register the same child with its final order key later in the
//! same cycle. Requests are queued here and run once at the end of the cycle.
//! Repeated requests for the same scroll view collapse into a single rebuild.

use std::collections::HashSet;

use log::trace;

use crate::scope::ScopeId;

/// Queue of scroll views waiting for a rebuild.
#[derive(Debug, Default)]
pub struct RebuildQueue {
    /// Pending views, in first-request order.
    pending: Vec<ScopeId>,
    /// Membership index for `pending`.
    queued: HashSet<ScopeId>,
}

impl RebuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a rebuild for `scope` at the end of the current cycle.
    ///
    /// Returns `false` if a rebuild was already pending.
    pub fn schedule(&mut self, scope: ScopeId) -> bool {
        if !self.queued.insert(scope) {
            trace!("Rebuild for {} already pending, coalescing", scope);
            return false;
        }
        trace!("Rebuild scheduled for {}", scope);
        self.pending.push(scope);
        true
    }

    /// Take every pending request, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<ScopeId> {
        self.queued.clear();
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self, scope: ScopeId) -> bool {
        self.queued.contains(&scope)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_requests_coalesce() {
        let mut queue = RebuildQueue::new();
        let a = ScopeId::new(1, 0);
        let b = ScopeId::new(2, 0);

        assert!(queue.schedule(a));
        assert!(queue.schedule(b));
        assert!(!queue.schedule(a));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.drain(), vec![a, b]);
        assert!(queue.is_empty());
        assert!(!queue.is_pending(a));
    }
}
