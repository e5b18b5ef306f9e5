//! The presentation-layer boundary: everything the core displays goes
//! through this trait. Rendering widgets, layout, and plot rasterization
//! live on the other side of it.

use polars::prelude::DataFrame;

use crate::chart::ChartSpec;
use crate::conversation::Message;

/// Sink for user-visible output. Implemented by the presentation layer;
/// each call is synchronous and display-only.
pub trait Presenter {
    /// Plain informational text.
    fn info(&mut self, text: &str);
    /// Confirmation of a completed action.
    fn success(&mut self, text: &str);
    /// Non-fatal problem the user should act on.
    fn warning(&mut self, text: &str);
    /// Failure notice for an action that did not complete.
    fn error(&mut self, text: &str);
    /// A titled table.
    fn table(&mut self, title: &str, frame: &DataFrame);
    /// A fully-specified plot request for the external renderer.
    fn plot(&mut self, spec: &ChartSpec);
    /// One chat transcript entry.
    fn message(&mut self, message: &Message);
}
