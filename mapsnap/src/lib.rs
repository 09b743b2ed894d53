//! mapsnap - Offline map snapshots and drawable change detection
//!
//! This library renders raster map snapshots from slippy-map tile servers
//! with styled drawables layered on top, optionally scaled for print at a
//! physical size. Separately, it computes which drawables changed between
//! successive generations so an interactive front end can repaint only
//! those.
//!
//! ```text
//! View ──► ZoomFitSolver ──► ViewportCompositor ──► (RgbaImage, transform)
//!                                  │        │
//!                              TileCache  DrawableRenderer
//!                                  │
//!                     TileProvider + HttpClient
//!
//! drawables ──► ChangeSetEngine ──► changeset
//! ```
//!
//! Every operation is synchronous and runs on the calling thread.

pub mod changes;
pub mod config;
pub mod coord;
pub mod drawable;
pub mod fit;
pub mod logging;
pub mod print;
pub mod provider;
pub mod render;
pub mod tile;

mod renderer;

pub use changes::{ChangeSetEngine, GroupMatching};
pub use config::RendererConfig;
pub use coord::{GeoProjector, LatLong, PixelPoint, TileIndex};
pub use drawable::{Colour, DrawableObject, DrawableRenderer, Geometry, RenderContext};
pub use fit::{BitmapView, View, ZoomFit, ZoomFitSolver};
pub use print::{PrintScaleSolver, RenderMemo};
pub use provider::{HttpClient, ProviderError, TileProvider};
pub use render::{CoordinateTransform, RenderError, RenderFlags, ScaledTransform, SnapshotTransform};
pub use renderer::MapSnapshotRenderer;
pub use tile::TileCache;
