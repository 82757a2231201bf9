//! Rendering collaborator seam.
//!
//! The scroll view never paints anything. It hands every rebuilt sequence to
//! a [`Scroller`], which is created by a factory injected at construction.

use crate::options::ScrollOptions;
use crate::sequence::Publish;

/// The widget that displays a published sequence.
pub trait Scroller<H> {
    /// Replace the displayed sequence.
    ///
    /// `publish.start_index` is only set on the first publish; otherwise the
    /// scroller keeps its current position.
    fn sequence_from(&mut self, publish: Publish<H>);

    /// Handle the enclosing scroll view should display for this scroller.
    ///
    /// Used when a scroll view registers itself with an outer one.
    fn render_handle(&self) -> H;
}

/// Creates a scroller from the options of the scroll view that owns it.
pub type ScrollerFactory<H> = Box<dyn Fn(&ScrollOptions) -> Box<dyn Scroller<H>>>;

/// Box a closure as a [`ScrollerFactory`].
pub fn factory<H, S, F>(f: F) -> ScrollerFactory<H>
where
    S: Scroller<H> + 'static,
    F: Fn(&ScrollOptions) -> S + 'static,
{
    Box::new(move |options| Box::new(f(options)) as Box<dyn Scroller<H>>)
}
