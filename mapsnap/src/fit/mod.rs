//! Zoom selection: fitting a geographic region into a pixel box.
//!
//! The solver walks the provider's zoom levels from the most detailed
//! downwards and picks the first at which the region's projected extent
//! fits inside `fit_fraction` of the target box. Because extents double
//! with each zoom level, that is also the zoom using the most area.

use tracing::{debug, trace};

use crate::coord::{GeoProjector, LatLong, PixelPoint};
use crate::provider::TileProvider;

/// Share of the target box a fitted region may occupy.
pub const DEFAULT_FIT_FRACTION: f64 = 0.975;

/// A geographic bounding rectangle with an explicit centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub centre: LatLong,
}

impl View {
    pub fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
        centre: LatLong,
    ) -> Self {
        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
            centre,
        }
    }

    /// A view centred on the midpoint of its bounds.
    pub fn from_bounds(min_latitude: f64, max_latitude: f64, min_longitude: f64, max_longitude: f64) -> Self {
        let centre = LatLong::new(
            (min_latitude + max_latitude) / 2.0,
            (min_longitude + max_longitude) / 2.0,
        );
        Self::new(min_latitude, max_latitude, min_longitude, max_longitude, centre)
    }

    /// The smallest view containing every point, or `None` for no points.
    pub fn enclosing(points: impl IntoIterator<Item = LatLong>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lon = min_lon.min(p.longitude);
            max_lon = max_lon.max(p.longitude);
        }
        Some(Self::from_bounds(min_lat, max_lat, min_lon, max_lon))
    }

    /// The four corners of the bounding rectangle.
    pub fn corners(&self) -> [LatLong; 4] {
        [
            LatLong::new(self.min_latitude, self.min_longitude),
            LatLong::new(self.min_latitude, self.max_longitude),
            LatLong::new(self.max_latitude, self.min_longitude),
            LatLong::new(self.max_latitude, self.max_longitude),
        ]
    }
}

/// Result of a zoom fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFit {
    pub zoom: u8,
    /// How fully the region uses the allowed share of the target box, 0 to 1.
    pub quality: f64,
}

/// A view resolved to a zoom level and a world-pixel centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapView {
    pub centre: PixelPoint,
    pub zoom: u8,
    pub fit_quality: f64,
}

/// Chooses the zoom level that best packs a region into a pixel box.
#[derive(Debug, Clone, Copy)]
pub struct ZoomFitSolver {
    projector: GeoProjector,
    min_zoom: u8,
    max_zoom: u8,
}

impl ZoomFitSolver {
    /// A solver searching `min_zoom..=max_zoom` with `projector`.
    pub fn new(projector: GeoProjector, min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            projector,
            min_zoom,
            max_zoom,
        }
    }

    /// A solver searching the zoom range and tile size of `provider`.
    pub fn for_provider(provider: &dyn TileProvider) -> Self {
        Self::new(
            GeoProjector::new(provider.tile_size(0)),
            provider.min_zoom(),
            provider.max_zoom(),
        )
    }

    pub fn projector(&self) -> GeoProjector {
        self.projector
    }

    /// Finds the most detailed zoom at which `points` fit in `fit_fraction`
    /// of a `target_width` × `target_height` box.
    ///
    /// Quality is the larger of the two axis fill ratios divided by
    /// `fit_fraction`, so a region touching the margin scores 1. When no
    /// zoom fits, or the box or point set is empty, the minimum zoom is
    /// returned with quality 0.
    pub fn best_fit(
        &self,
        points: &[LatLong],
        target_width: u32,
        target_height: u32,
        fit_fraction: f64,
    ) -> ZoomFit {
        let fallback = ZoomFit {
            zoom: self.min_zoom,
            quality: 0.0,
        };
        if points.is_empty() || target_width == 0 || target_height == 0 {
            return fallback;
        }

        let width = target_width as f64;
        let height = target_height as f64;

        for zoom in (self.min_zoom..=self.max_zoom).rev() {
            let (extent_x, extent_y) = self.extent(points, zoom);
            trace!(zoom, extent_x, extent_y, "Testing zoom fit");

            if extent_x <= fit_fraction * width && extent_y <= fit_fraction * height {
                let used = (extent_x / width).max(extent_y / height);
                let quality = (used / fit_fraction).clamp(0.0, 1.0);
                return ZoomFit { zoom, quality };
            }
        }

        debug!(
            target_width,
            target_height, "Region does not fit at any zoom level"
        );
        fallback
    }

    /// Resolves `view` for a `width` × `height` image.
    ///
    /// The zoom comes from fitting the view's corners; the centre is the
    /// view's own centre projected at that zoom.
    pub fn bitmap_view(&self, view: &View, width: u32, height: u32, fit_fraction: f64) -> BitmapView {
        let fit = self.best_fit(&view.corners(), width, height, fit_fraction);
        let centre = self
            .projector
            .pixel_for(view.centre.latitude, view.centre.longitude, fit.zoom);

        BitmapView {
            centre,
            zoom: fit.zoom,
            fit_quality: fit.quality,
        }
    }

    fn extent(&self, points: &[LatLong], zoom: u8) -> (f64, f64) {
        let mut min = PixelPoint::new(f64::INFINITY, f64::INFINITY);
        let mut max = PixelPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            let px = self.projector.pixel_for(p.latitude, p.longitude, zoom);
            min.x = min.x.min(px.x);
            min.y = min.y.min(px.y);
            max.x = max.x.max(px.x);
            max.y = max.y.max(px.y);
        }
        (max.x - min.x, max.y - min.y)
    }
}
