//! Tile provider trait and error types.

use thiserror::Error;

use crate::coord::{DEFAULT_TILE_SIZE, MAX_ZOOM};

/// Errors raised while talking to a tile source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport failure or non-2xx status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered successfully but sent no bytes.
    #[error("Empty response body from {0}")]
    EmptyBody(String),

    /// The body could not be decoded as a raster image.
    #[error("Image decode failed: {0}")]
    DecodeError(String),
}

/// Describes how a raster tile source addresses its tiles.
///
/// A provider only builds URLs and reports the pyramid geometry; fetching
/// is done by the tile cache through an [`HttpClient`](super::HttpClient).
pub trait TileProvider: Send + Sync {
    /// Builds the URL of tile (`x`, `y`) at `zoom`.
    ///
    /// `x` is expected to be already wrapped into the world width.
    fn tile_url(&self, x: i64, y: i64, zoom: u8) -> String;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Tile edge length in pixels at `zoom`.
    fn tile_size(&self, _zoom: u8) -> u32 {
        DEFAULT_TILE_SIZE
    }

    /// Number of tiles spanning the world width at `zoom`, capped at
    /// [`MAX_ZOOM`].
    fn tile_count_wide(&self, zoom: u8) -> i64 {
        1i64 << zoom.min(MAX_ZOOM)
    }

    /// Returns whether `zoom` lies within the provider's range.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}
