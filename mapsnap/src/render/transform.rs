//! Coordinate transforms handed out with every rendered image.
//!
//! A transform maps geographic positions onto one specific output image.
//! Positions are first projected to world pixels at the render zoom, then
//! offset by the viewport origin to land in image space.

use crate::coord::{GeoProjector, LatLong, PixelPoint};

use super::RenderError;

/// Visible area of an image in world pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    /// The integral `width` × `height` rectangle centred on `centre`.
    pub fn centred(centre: PixelPoint, width: u32, height: u32) -> Self {
        Self {
            x: (centre.x - (width / 2) as f64).floor(),
            y: (centre.y - (height / 2) as f64).floor(),
            width: width as f64,
            height: height as f64,
        }
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Opaque key identifying the pixel space a transform maps into.
///
/// Renderers may use it to memoize per-zoom projections of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoomKey {
    zoom: u8,
    scale_bits: u64,
}

impl ZoomKey {
    fn new(zoom: u8, scale: f64) -> Self {
        Self {
            zoom,
            scale_bits: scale.to_bits(),
        }
    }
}

/// Maps geographic positions onto a rendered image.
pub trait CoordinateTransform: Send + Sync {
    /// Position of `at` in world pixel space.
    fn world_position(&self, at: LatLong) -> PixelPoint;

    /// The image's rectangle in world pixel space.
    fn viewport(&self) -> ViewportRect;

    /// Key shared by every transform mapping into the same pixel space.
    fn zoom_key(&self) -> ZoomKey;

    /// Reverse mapping from an image pixel back to a geographic position.
    fn lat_long_at(&self, pixel_x: i32, pixel_y: i32) -> Result<LatLong, RenderError>;

    /// Position of `at` on the image itself.
    fn screen_position(&self, at: LatLong) -> PixelPoint {
        let world = self.world_position(at);
        let viewport = self.viewport();
        PixelPoint::new(world.x - viewport.x, world.y - viewport.y)
    }
}

/// Transform of a one-shot snapshot render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotTransform {
    projector: GeoProjector,
    zoom: u8,
    viewport: ViewportRect,
}

impl SnapshotTransform {
    /// The transform of a `width` × `height` image centred on world pixel
    /// `centre` at `zoom`.
    pub fn new(projector: GeoProjector, centre: PixelPoint, width: u32, height: u32, zoom: u8) -> Self {
        Self {
            projector,
            zoom,
            viewport: ViewportRect::centred(centre, width, height),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }
}

impl CoordinateTransform for SnapshotTransform {
    fn world_position(&self, at: LatLong) -> PixelPoint {
        self.projector.pixel_for(at.latitude, at.longitude, self.zoom)
    }

    fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    fn zoom_key(&self) -> ZoomKey {
        ZoomKey::new(self.zoom, 1.0)
    }

    fn lat_long_at(&self, _pixel_x: i32, _pixel_y: i32) -> Result<LatLong, RenderError> {
        Err(RenderError::Unsupported(
            "reverse pixel to lat/long mapping on a snapshot",
        ))
    }
}

/// A snapshot transform whose pixel space has been uniformly rescaled.
///
/// Produced by print rendering, where a background rendered at an assumed
/// source resolution is resized to the requested output resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledTransform {
    inner: SnapshotTransform,
    factor: f64,
}

impl ScaledTransform {
    /// Wraps `inner`, multiplying its screen positions by `factor`.
    pub fn new(inner: SnapshotTransform, factor: f64) -> Self {
        Self { inner, factor }
    }

    pub fn scale_factor(&self) -> f64 {
        self.factor
    }

    /// The transform of the source-resolution render.
    pub fn unscaled(&self) -> &SnapshotTransform {
        &self.inner
    }
}

impl CoordinateTransform for ScaledTransform {
    fn world_position(&self, at: LatLong) -> PixelPoint {
        let p = self.inner.world_position(at);
        PixelPoint::new(p.x * self.factor, p.y * self.factor)
    }

    fn viewport(&self) -> ViewportRect {
        self.inner.viewport().scaled(self.factor)
    }

    fn zoom_key(&self) -> ZoomKey {
        ZoomKey::new(self.inner.zoom, self.factor)
    }

    fn lat_long_at(&self, _pixel_x: i32, _pixel_y: i32) -> Result<LatLong, RenderError> {
        Err(RenderError::Unsupported(
            "reverse pixel to lat/long mapping on a print render",
        ))
    }
}
