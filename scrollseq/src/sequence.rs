//! The ordered artifact handed to the scroller.

use std::ops::Deref;
use std::sync::Arc;

/// Ordered list of render handles.
///
/// Built fresh on every reconciliation and never mutated after handoff.
/// Cloning shares the same backing slice.
#[derive(Debug, PartialEq, Eq)]
pub struct Sequence<H> {
    handles: Arc<[H]>,
}

impl<H> Sequence<H> {
    pub fn empty() -> Self {
        Self {
            handles: Arc::from(Vec::new()),
        }
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }
}

impl<H> Clone for Sequence<H> {
    fn clone(&self) -> Self {
        Self {
            handles: Arc::clone(&self.handles),
        }
    }
}

impl<H> Default for Sequence<H> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H> From<Vec<H>> for Sequence<H> {
    fn from(handles: Vec<H>) -> Self {
        Self {
            handles: Arc::from(handles),
        }
    }
}

impl<H> FromIterator<H> for Sequence<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<H> Deref for Sequence<H> {
    type Target = [H];

    fn deref(&self) -> &[H] {
        &self.handles
    }
}

/// One outbound publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish<H> {
    /// Replaces whatever the scroller showed before.
    pub sequence: Sequence<H>,
    /// Initially visible position. Only set on the first publish of a scroll
    /// view that was created with a start position; `None` tells the scroller
    /// to keep its current position.
    pub start_index: Option<usize>,
}
