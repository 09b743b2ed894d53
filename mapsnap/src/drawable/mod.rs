//! Drawable records and the rendering callback that paints them.

mod renderer;
mod types;

pub use renderer::{DrawableRenderer, RenderContext, SkiaDrawableRenderer};
pub use types::{Colour, DrawableObject, Geometry};
