//! Change detection between successive generations of drawables and of
//! the selection.
//!
//! Callers redraw only the records a [`ChangeSetEngine`] reports, so a
//! missing record means a stale canvas and an extra one means wasted work.

mod engine;

pub use engine::{ChangeSetEngine, GroupMatching};
