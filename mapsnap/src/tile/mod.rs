//! Raster tile retrieval.
//!
//! [`TileCache`] is the only entry point: it wraps tile columns around the
//! antimeridian, looks tiles up by URL and falls back to a blocking
//! download with [`MAX_FETCH_ATTEMPTS`] attempts.

mod cache;
mod loader;

pub use cache::{TileCache, TileCacheStats};
pub use loader::{load_tile, MAX_FETCH_ATTEMPTS};
