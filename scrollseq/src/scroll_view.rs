//! A single scroll view instance.

use log::debug;

use crate::child::{ChildDescriptor, ChildId};
use crate::options::ScrollOptions;
use crate::reconcile::Reconciler;
use crate::registry::{ChildRegistry, InsertOutcome};
use crate::scroller::{Scroller, ScrollerFactory};
use crate::sequence::Sequence;

/// Child registry, reconciler and scroller of one scroll view.
///
/// Mutations only touch the registry. Publishing happens in [`ScrollView::rebuild`],
/// which the scope tree calls once per processing cycle for every view that
/// changed.
pub struct ScrollView<H> {
    options: ScrollOptions,
    registry: ChildRegistry<H>,
    reconciler: Reconciler,
    scroller: Box<dyn Scroller<H>>,
    /// Last sequence handed to the scroller.
    published: Option<Sequence<H>>,
    publish_count: u64,
}

impl<H: Clone> ScrollView<H> {
    /// Create a scroll view, building its scroller through `factory`.
    pub fn new(
        options: ScrollOptions,
        start_position: Option<usize>,
        factory: &ScrollerFactory<H>,
    ) -> Self {
        let scroller = factory(&options);
        Self {
            options,
            registry: ChildRegistry::new(),
            reconciler: Reconciler::new(start_position),
            scroller,
            published: None,
            publish_count: 0,
        }
    }

    pub fn insert(&mut self, descriptor: ChildDescriptor<H>) -> InsertOutcome {
        self.registry.insert(descriptor)
    }

    pub fn remove(&mut self, id: ChildId) -> Option<ChildDescriptor<H>> {
        self.registry.remove(id)
    }

    /// Rebuild the sequence and publish it to the scroller.
    pub fn rebuild(&mut self) {
        let publish = self.reconciler.rebuild(&self.registry);
        self.published = Some(publish.sequence.clone());
        self.publish_count += 1;
        debug!(
            "Publishing {} items (publish #{})",
            publish.sequence.len(),
            self.publish_count
        );
        self.scroller.sequence_from(publish);
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn registry(&self) -> &ChildRegistry<H> {
        &self.registry
    }

    /// Last published sequence, `None` before the first publish.
    pub fn published(&self) -> Option<&Sequence<H>> {
        self.published.as_ref()
    }

    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }

    /// Handle under which this view registers with an enclosing view.
    pub fn render_handle(&self) -> H {
        self.scroller.render_handle()
    }
}

impl<H> std::fmt::Debug for ScrollView<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollView")
            .field("options", &self.options)
            .field("children", &self.registry.len())
            .field("publish_count", &self.publish_count)
            .finish()
    }
}
