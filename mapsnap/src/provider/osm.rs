//! OpenStreetMap-style XYZ tile providers.
//!
//! # Coordinate System
//!
//! Standard Web Mercator XYZ tile coordinates:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level

use super::types::TileProvider;

/// Default OpenStreetMap raster tile template.
pub const OSM_TILE_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Generic XYZ provider driven by a URL template.
///
/// The template may contain `{x}`, `{y}` and `{z}` placeholders, e.g.
/// `https://tiles.example.com/{z}/{x}/{y}.png`.
#[derive(Debug, Clone)]
pub struct TemplateTileProvider {
    name: String,
    template: String,
    min_zoom: u8,
    max_zoom: u8,
    tile_size: u32,
}

impl TemplateTileProvider {
    /// Creates a provider serving 256-pixel tiles for zoom `0..=max_zoom`.
    pub fn new(name: impl Into<String>, template: impl Into<String>, max_zoom: u8) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            min_zoom: 0,
            max_zoom,
            tile_size: crate::coord::DEFAULT_TILE_SIZE,
        }
    }

    /// Sets the lowest zoom level the source serves.
    pub fn with_min_zoom(mut self, min_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    /// Sets the tile edge length for sources serving non-standard tiles.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }
}

impl TileProvider for TemplateTileProvider {
    fn tile_url(&self, x: i64, y: i64, zoom: u8) -> String {
        self.template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    fn tile_size(&self, _zoom: u8) -> u32 {
        self.tile_size
    }
}

/// The public OpenStreetMap tile server.
///
/// Usage is subject to the OSM tile usage policy, which requires a
/// descriptive `User-Agent`; the default HTTP client sends one.
#[derive(Debug, Clone)]
pub struct OsmTileProvider {
    inner: TemplateTileProvider,
}

impl Default for OsmTileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OsmTileProvider {
    pub fn new() -> Self {
        Self {
            inner: TemplateTileProvider::new("OpenStreetMap", OSM_TILE_TEMPLATE, 19),
        }
    }
}

impl TileProvider for OsmTileProvider {
    fn tile_url(&self, x: i64, y: i64, zoom: u8) -> String {
        self.inner.tile_url(x, y, zoom)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn min_zoom(&self) -> u8 {
        self.inner.min_zoom()
    }

    fn max_zoom(&self) -> u8 {
        self.inner.max_zoom()
    }
}
