//! Ordered child sequences for scroll views.
//!
//! Children mount and unmount in any order. Each one registers a render handle
//! and an order key with the nearest enclosing scroll view. At the end of every
//! processing cycle, each scroll view that changed rebuilds its sequence
//! (sorted by order key, ties in registration order) and hands it to its
//! scroller.

pub mod child;
pub mod driver;
pub mod error;
pub mod options;
pub mod reconcile;
pub mod registry;
pub mod scheduler;
pub mod scope;
pub mod scroll_view;
pub mod scroller;
pub mod sequence;

pub use child::{ChildDescriptor, ChildId, Notification, OrderKey};
pub use driver::{Command, Driver, DriverHandle};
pub use error::{Error, Result};
pub use options::{Direction, ScrollOptions};
pub use reconcile::Reconciler;
pub use registry::{ChildRegistry, InsertOutcome};
pub use scope::{Routed, ScopeId, ScopeTree};
pub use scroll_view::ScrollView;
pub use scroller::{Scroller, ScrollerFactory, factory};
pub use sequence::{Publish, Sequence};
