//! Coordinate types shared by the projector, tile cache and renderers.

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Deepest zoom level the projector models.
///
/// Tile counts and world sizes for deeper zooms are those of this level.
pub const MAX_ZOOM: u8 = 30;

/// Standard raster tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLong {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLong {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A position in projected ("world bitmap") pixel space at one zoom level.
///
/// The origin is the north-west corner of the world; x grows east and y
/// grows south.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Address of one tile in the power-of-two pyramid.
///
/// Indices are signed because viewport arithmetic routinely produces
/// columns west of the antimeridian; see [`GeoProjector::wrap_tile_x`].
///
/// [`GeoProjector::wrap_tile_x`]: super::GeoProjector::wrap_tile_x
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub x: i64,
    pub y: i64,
    pub zoom: u8,
}

impl TileIndex {
    pub const fn new(x: i64, y: i64, zoom: u8) -> Self {
        Self { x, y, zoom }
    }
}
