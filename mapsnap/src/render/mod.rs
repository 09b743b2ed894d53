//! Snapshot rendering: canvas flags, coordinate transforms and the tile
//! compositor.
//!
//! ```text
//! centre + size + zoom ──► ViewportCompositor ──► (RgbaImage, SnapshotTransform)
//!                              │        │
//!                          TileCache  DrawableRenderer
//! ```

mod compositor;
mod error;
mod flags;
mod transform;

pub use compositor::ViewportCompositor;
pub use error::RenderError;
pub use flags::{base_image, check_canvas, RenderFlags, DEFAULT_MAX_CANVAS_BYTES};
pub use transform::{CoordinateTransform, ScaledTransform, SnapshotTransform, ViewportRect, ZoomKey};
