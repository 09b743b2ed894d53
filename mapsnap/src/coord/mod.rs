//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator world-pixel and tile coordinates for a power-of-two
//! tile pyramid.
//!
//! Zoom level 0 shows the whole world in a single tile; every further level
//! doubles the number of tiles along each axis.

mod types;

pub use types::{LatLong, PixelPoint, TileIndex, DEFAULT_TILE_SIZE, MAX_LAT, MAX_ZOOM, MIN_LAT};

use std::f64::consts::PI;

/// Projects geographic coordinates onto the pixel space of a tile pyramid.
///
/// The projector is a pure function of the tile edge length; it holds no
/// other state and is cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoProjector {
    tile_size: u32,
}

impl Default for GeoProjector {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl GeoProjector {
    /// Creates a projector for tiles of `tile_size` × `tile_size` pixels.
    pub const fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Tile edge length in pixels. Constant across zoom levels.
    #[inline]
    pub fn tile_size(&self, _zoom: u8) -> u32 {
        self.tile_size
    }

    /// Number of tiles spanning the full world width at `zoom`.
    ///
    /// Zooms beyond [`MAX_ZOOM`] count as [`MAX_ZOOM`].
    #[inline]
    pub fn tile_count_wide(&self, zoom: u8) -> i64 {
        1i64 << zoom.min(MAX_ZOOM)
    }

    /// Number of tiles spanning the full world height at `zoom`.
    #[inline]
    pub fn tile_count_high(&self, zoom: u8) -> i64 {
        1i64 << zoom.min(MAX_ZOOM)
    }

    /// Width (and height) of the whole world in pixels at `zoom`.
    #[inline]
    pub fn world_size(&self, zoom: u8) -> f64 {
        self.tile_size as f64 * self.tile_count_wide(zoom) as f64
    }

    /// Converts geographic coordinates to world pixel coordinates.
    ///
    /// Latitudes beyond the Web Mercator limits are clamped; longitudes are
    /// projected linearly so values outside ±180 land off the world edge.
    #[inline]
    pub fn pixel_for(&self, lat: f64, lon: f64, zoom: u8) -> PixelPoint {
        let size = self.world_size(zoom);

        let x = (lon + 180.0) / 360.0 * size;

        let lat_rad = lat.clamp(MIN_LAT, MAX_LAT) * PI / 180.0;
        let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * size;

        PixelPoint::new(x, y)
    }

    /// Converts world pixel coordinates back to geographic coordinates.
    #[inline]
    pub fn lat_long_for(&self, pixel: PixelPoint, zoom: u8) -> LatLong {
        let size = self.world_size(zoom);

        let lon = pixel.x / size * 360.0 - 180.0;

        let y = pixel.y / size;
        let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();

        LatLong::new(lat_rad * 180.0 / PI, lon)
    }

    /// Returns the index of the tile containing the given world pixel.
    ///
    /// The result is not wrapped; callers that address a tile source must
    /// pass the column through [`wrap_tile_x`](Self::wrap_tile_x).
    #[inline]
    pub fn tile_index_for(&self, pixel_x: f64, pixel_y: f64, zoom: u8) -> TileIndex {
        let size = self.tile_size(zoom) as f64;
        TileIndex::new(
            (pixel_x / size).floor() as i64,
            (pixel_y / size).floor() as i64,
            zoom,
        )
    }

    /// Normalises a tile column into `0..tile_count_wide(zoom)`.
    ///
    /// The map repeats east and west, so column `-1` is the last column and
    /// column `tile_count_wide` is column `0`.
    #[inline]
    pub fn wrap_tile_x(&self, tile_x: i64, zoom: u8) -> i64 {
        tile_x.rem_euclid(self.tile_count_wide(zoom))
    }
}
