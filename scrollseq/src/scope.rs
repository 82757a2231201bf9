//! Scope tree and notification routing.
//!
//! Every mounted node owns a scope with a link to its parent scope. Child
//! registrations travel up those links and are captured by the nearest
//! enclosing scroll view, then go no further. A scroll view never captures its
//! own notification, which is how a nested view registers with the outer one
//! while its own children stay with it.
//!
//! # Example
//!
//! ```
//! use scrollseq::{factory, OrderKey, Publish, ScopeTree, ScrollOptions, Scroller};
//!
//! struct Print;
//!
//! impl Scroller<&'static str> for Print {
//!     fn sequence_from(&mut self, publish: Publish<&'static str>) {
//!         println!("{:?}", publish.sequence.handles());
//!     }
//!
//!     fn render_handle(&self) -> &'static str {
//!         "scroller"
//!     }
//! }
//!
//! let mut tree = ScopeTree::new(factory(|_: &ScrollOptions| Print));
//! let view = tree.mount_scroll_view(None, ScrollOptions::default(), None, OrderKey::Unset).unwrap();
//! tree.cycle(|tree| {
//!     tree.mount_child(view, 1, "a").unwrap();
//!     tree.mount_child(view, 0, "b").unwrap();
//! });
//! assert_eq!(tree.view(view).unwrap().published().unwrap().handles(), &["b", "a"]);
//! ```

use log::{debug, trace, warn};

use crate::child::{ChildDescriptor, ChildId, Notification, OrderKey};
use crate::error::{Error, Result};
use crate::options::ScrollOptions;
use crate::scheduler::RebuildQueue;
use crate::scroll_view::ScrollView;
use crate::scroller::ScrollerFactory;

/// Identifier of a scope in a [`ScopeTree`].
///
/// Arena slots are recycled after unmount. Each reuse bumps the slot's
/// generation, so an id held past its unmount never resolves to the new
/// occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId {
    index: usize,
    generation: u32,
}

impl ScopeId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope#{}v{}", self.index, self.generation)
    }
}

/// Where a notification ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Captured by the scroll view in this scope.
    Accepted(ScopeId),
    /// Reached the root without meeting a scroll view.
    Unclaimed,
}

impl Routed {
    pub fn accepted_by(&self) -> Option<ScopeId> {
        match self {
            Routed::Accepted(id) => Some(*id),
            Routed::Unclaimed => None,
        }
    }
}

struct Scope<H> {
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    view: Option<ScrollView<H>>,
    /// Registration this scope currently holds, kept so unmount can retract it.
    /// A scope owns at most one child identity at a time.
    registration: Option<ChildDescriptor<H>>,
}

impl<H> Scope<H> {
    fn new(parent: Option<ScopeId>, view: Option<ScrollView<H>>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            view,
            registration: None,
        }
    }
}

/// One arena slot. `generation` counts how many scopes have left it.
struct Slot<H> {
    generation: u32,
    scope: Option<Scope<H>>,
}

/// Arena of scopes plus the deferred rebuild queue.
pub struct ScopeTree<H> {
    slots: Vec<Slot<H>>,
    /// Vacant slot indices, reused before the arena grows.
    free: Vec<usize>,
    queue: RebuildQueue,
    factory: ScrollerFactory<H>,
}

impl<H: Clone> ScopeTree<H> {
    /// Create an empty tree. `factory` builds the scroller of every scroll
    /// view mounted in it.
    pub fn new(factory: ScrollerFactory<H>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            queue: RebuildQueue::new(),
            factory,
        }
    }

    // =========================================================================
    // Mounting
    // =========================================================================

    /// Create a plain scope that neither registers nor captures.
    pub fn create_scope(&mut self, parent: Option<ScopeId>) -> Result<ScopeId> {
        self.attach(parent, None)
    }

    /// Mount a child under `parent` and register it with the nearest
    /// enclosing scroll view.
    pub fn mount_child(
        &mut self,
        parent: ScopeId,
        order_key: impl Into<OrderKey>,
        handle: H,
    ) -> Result<ScopeId> {
        let scope = self.attach(Some(parent), None)?;
        let descriptor = ChildDescriptor::new(ChildId::next(), order_key, handle);
        self.notify(scope, Notification::Register(descriptor))?;
        Ok(scope)
    }

    /// Mount a scroll view.
    ///
    /// When mounted below another scope it registers its own render handle
    /// with the nearest enclosing scroll view under `order_key`.
    pub fn mount_scroll_view(
        &mut self,
        parent: Option<ScopeId>,
        options: ScrollOptions,
        start_position: Option<usize>,
        order_key: impl Into<OrderKey>,
    ) -> Result<ScopeId> {
        debug!(
            "Mounting scroll view (direction: {:?}, start position: {:?})",
            options.direction, start_position
        );
        let view = ScrollView::new(options, start_position, &self.factory);
        let handle = view.render_handle();
        let scope = self.attach(parent, Some(view))?;

        if parent.is_some() {
            let descriptor = ChildDescriptor::new(ChildId::next(), order_key, handle);
            self.notify(scope, Notification::Register(descriptor))?;
        }

        Ok(scope)
    }

    /// Re-register the child owned by `scope` under a new order key.
    ///
    /// Keeps the identity and handle, so the enclosing view overwrites its
    /// entry instead of adding one.
    pub fn rebind(&mut self, scope: ScopeId, order_key: impl Into<OrderKey>) -> Result<Routed> {
        let Some(current) = self.scope(scope)?.registration.clone() else {
            warn!("Rebind on {} which never registered", scope);
            return Ok(Routed::Unclaimed);
        };
        let descriptor = ChildDescriptor::new(current.id, order_key, current.handle);
        self.notify(scope, Notification::Register(descriptor))
    }

    /// Swap the render handle of the child owned by `scope`.
    pub fn replace_handle(&mut self, scope: ScopeId, handle: H) -> Result<Routed> {
        let Some(current) = self.scope(scope)?.registration.clone() else {
            warn!("Handle replacement on {} which never registered", scope);
            return Ok(Routed::Unclaimed);
        };
        let descriptor = ChildDescriptor::new(current.id, current.order_key, handle);
        self.notify(scope, Notification::Register(descriptor))
    }

    /// Unmount `scope` and everything below it.
    ///
    /// Every registration in the subtree is retracted, deepest first, before
    /// the scopes are dropped.
    pub fn unmount(&mut self, scope: ScopeId) -> Result<()> {
        let parent = self.scope(scope)?.parent;

        let mut doomed = Vec::new();
        self.collect_post_order(scope, &mut doomed);

        for &id in &doomed {
            if let Some(child_id) = self.child_id(id) {
                self.notify(id, Notification::Unregister(child_id))?;
            }
        }

        for &id in &doomed {
            self.release(id);
        }

        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&child| child != scope);
        }

        debug!("Unmounted {} ({} scopes)", scope, doomed.len());
        Ok(())
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Route a notification from `origin` to the nearest enclosing scroll view.
    ///
    /// The origin's own view, if any, is skipped. The first view found
    /// captures the notification and schedules a rebuild; ancestors above it
    /// never see it.
    ///
    /// Registering under a new identity while the origin already holds one
    /// retracts the old identity first.
    pub fn notify(&mut self, origin: ScopeId, notification: Notification<H>) -> Result<Routed> {
        let mut current = self.scope(origin)?.parent;
        let kind = notification.kind();

        if let Notification::Register(descriptor) = &notification {
            let previous = self.child_id(origin).filter(|&id| id != descriptor.id);
            if let Some(previous) = previous {
                debug!(
                    "{} re-registers as {}, retracting {}",
                    origin, descriptor.id, previous
                );
                self.notify(origin, Notification::Unregister(previous))?;
            }
        }

        while let Some(id) = current {
            let scope = self.get_mut(id).ok_or(Error::UnknownScope(id))?;

            let Some(view) = scope.view.as_mut() else {
                trace!("{} passes {} from {} upward", id, kind, origin);
                current = scope.parent;
                continue;
            };

            let changed = match &notification {
                Notification::Register(descriptor) => {
                    view.insert(descriptor.clone());
                    true
                }
                Notification::Unregister(child_id) => view.remove(*child_id).is_some(),
            };
            trace!("{} captured {} from {}", id, kind, origin);

            if changed {
                self.queue.schedule(id);
            }
            self.record(origin, notification);
            return Ok(Routed::Accepted(id));
        }

        warn!("No scroll view encloses {}, dropping {}", origin, kind);
        Ok(Routed::Unclaimed)
    }

    // =========================================================================
    // Cycle boundary
    // =========================================================================

    /// End the current processing cycle: rebuild and publish every scroll
    /// view that changed since the last flush, once each.
    ///
    /// Returns the number of publishes.
    pub fn flush(&mut self) -> usize {
        let pending = self.queue.drain();
        let mut published = 0;

        for id in pending {
            let Some(view) = self.get_mut(id).and_then(|scope| scope.view.as_mut()) else {
                debug!("Skipping rebuild for unmounted {}", id);
                continue;
            };
            view.rebuild();
            published += 1;
        }

        published
    }

    /// Run `f` as one processing cycle, then flush.
    pub fn cycle<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let result = f(self);
        self.flush();
        result
    }

    /// Whether any rebuild is waiting for the cycle boundary.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn view(&self, scope: ScopeId) -> Option<&ScrollView<H>> {
        self.get(scope).and_then(|s| s.view.as_ref())
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.get(scope).and_then(|s| s.parent)
    }

    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        self.get(scope)
            .map(|s| s.children.as_slice())
            .unwrap_or(&[])
    }

    /// Identity the child in `scope` is registered under.
    pub fn child_id(&self, scope: ScopeId) -> Option<ChildId> {
        self.get(scope)
            .and_then(|s| s.registration.as_ref())
            .map(|descriptor| descriptor.id)
    }

    pub fn contains(&self, scope: ScopeId) -> bool {
        self.get(scope).is_some()
    }

    /// Number of arena slots, vacant ones included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn get(&self, id: ScopeId) -> Option<&Scope<H>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_ref())
    }

    fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope<H>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_mut())
    }

    fn scope(&self, id: ScopeId) -> Result<&Scope<H>> {
        self.get(id).ok_or(Error::UnknownScope(id))
    }

    fn attach(&mut self, parent: Option<ScopeId>, view: Option<ScrollView<H>>) -> Result<ScopeId> {
        if let Some(parent_id) = parent {
            self.scope(parent_id)?;
        }

        let scope = Some(Scope::new(parent, view));
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.scope = scope;
                ScopeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    scope,
                });
                ScopeId::new(self.slots.len() - 1, 0)
            }
        };

        if let Some(parent_scope) = parent.and_then(|p| self.get_mut(p)) {
            parent_scope.children.push(id);
        }

        trace!("Attached {} under {:?}", id, parent);
        Ok(id)
    }

    /// Vacate the slot of `id` and retire its generation.
    fn release(&mut self, id: ScopeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation && slot.scope.is_some())
        else {
            return;
        };
        slot.scope = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    fn record(&mut self, origin: ScopeId, notification: Notification<H>) {
        let Some(scope) = self.get_mut(origin) else {
            return;
        };
        match notification {
            Notification::Register(descriptor) => scope.registration = Some(descriptor),
            Notification::Unregister(child_id) => {
                if scope.registration.as_ref().is_some_and(|d| d.id == child_id) {
                    scope.registration = None;
                }
            }
        }
    }

    fn collect_post_order(&self, id: ScopeId, out: &mut Vec<ScopeId>) {
        if let Some(scope) = self.get(id) {
            for &child in &scope.children {
                self.collect_post_order(child, out);
            }
            out.push(id);
        }
    }
}

impl<H> ScopeTree<H> {
    /// Number of mounted scopes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> std::fmt::Debug for ScopeTree<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeTree")
            .field("scopes", &self.len())
            .field("slots", &self.slots.len())
            .field("pending_rebuilds", &self.queue.len())
            .finish()
    }
}
