//! Tile compositing for one-shot snapshot renders.

use std::sync::Arc;

use image::{imageops, RgbaImage};
use parking_lot::Mutex;
use tracing::debug;

use super::flags::{base_image, check_canvas, DEFAULT_MAX_CANVAS_BYTES};
use super::transform::{CoordinateTransform, SnapshotTransform, ViewportRect};
use super::{RenderError, RenderFlags};
use crate::coord::{GeoProjector, PixelPoint};
use crate::drawable::{DrawableObject, DrawableRenderer};
use crate::tile::TileCache;

/// Lays background tiles into a canvas and overlays drawables.
///
/// Calls on one compositor are serialized.
pub struct ViewportCompositor {
    tiles: Arc<TileCache>,
    renderer: Arc<dyn DrawableRenderer>,
    max_canvas_bytes: u64,
    render_lock: Mutex<()>,
}

impl ViewportCompositor {
    /// Creates a compositor drawing background tiles from `tiles` and
    /// drawables with `renderer`.
    pub fn new(tiles: Arc<TileCache>, renderer: Arc<dyn DrawableRenderer>) -> Self {
        Self {
            tiles,
            renderer,
            max_canvas_bytes: DEFAULT_MAX_CANVAS_BYTES,
            render_lock: Mutex::new(()),
        }
    }

    /// Set the largest RGBA buffer a single render may allocate.
    pub fn with_max_canvas_bytes(mut self, max_canvas_bytes: u64) -> Self {
        self.max_canvas_bytes = max_canvas_bytes;
        self
    }

    /// Projector of the tile source's pyramid.
    pub fn projector(&self) -> GeoProjector {
        self.tiles.projector()
    }

    /// The tile cache backgrounds are drawn from.
    pub fn tiles(&self) -> &TileCache {
        &self.tiles
    }

    /// The renderer drawables are handed to.
    pub fn renderer(&self) -> &dyn DrawableRenderer {
        self.renderer.as_ref()
    }

    /// Largest RGBA buffer a single render may allocate, in bytes.
    pub fn max_canvas_bytes(&self) -> u64 {
        self.max_canvas_bytes
    }

    /// Checks that a render at `width` × `height` and `zoom` can proceed.
    ///
    /// The zoom must be served by the tile provider and the canvas must be
    /// non-empty and within [`max_canvas_bytes`](Self::max_canvas_bytes).
    pub fn validate(&self, width: u32, height: u32, zoom: u8) -> Result<(), RenderError> {
        let provider = self.tiles.provider();
        if !provider.supports_zoom(zoom) {
            return Err(RenderError::RenderingFailed(format!(
                "zoom {} outside {}..={} served by {}",
                zoom,
                provider.min_zoom(),
                provider.max_zoom(),
                provider.name()
            )));
        }
        check_canvas(width, height, self.max_canvas_bytes)
    }

    /// Transform of a `width` × `height` image centred on world pixel `centre`.
    pub fn transform_for(&self, centre: PixelPoint, width: u32, height: u32, zoom: u8) -> SnapshotTransform {
        SnapshotTransform::new(self.projector(), centre, width, height, zoom)
    }

    /// Renders a `width` × `height` image centred on world pixel `centre`.
    ///
    /// With [`RenderFlags::SHOW_BACKGROUND`] every tile overlapping the
    /// canvas is drawn; tiles that cannot be fetched leave their cell
    /// blank. Drawables, when given, are passed to the renderer in a single
    /// call with [`RenderFlags::RENDER_FADE`] added.
    ///
    /// Fails with [`RenderError::RenderingFailed`] when [`validate`]
    /// rejects the size or zoom.
    ///
    /// [`validate`]: Self::validate
    pub fn compose(
        &self,
        centre: PixelPoint,
        width: u32,
        height: u32,
        zoom: u8,
        flags: RenderFlags,
        drawables: Option<&[DrawableObject]>,
    ) -> Result<(RgbaImage, SnapshotTransform), RenderError> {
        let _guard = self.render_lock.lock();
        self.validate(width, height, zoom)?;

        let transform = self.transform_for(centre, width, height, zoom);
        let mut image = base_image(width, height, flags);

        if flags.contains(RenderFlags::SHOW_BACKGROUND) {
            self.draw_tiles(&mut image, zoom, &transform.viewport());
        }

        if let Some(drawables) = drawables {
            self.renderer.render_all(
                &mut image,
                drawables,
                &transform,
                flags | RenderFlags::RENDER_FADE,
                None,
            )?;
        }

        Ok((image, transform))
    }

    fn draw_tiles(&self, canvas: &mut RgbaImage, zoom: u8, viewport: &ViewportRect) {
        let projector = self.projector();
        let size = projector.tile_size(zoom) as i64;
        let (width, height) = canvas.dimensions();
        let (width, height) = (width as i64, height as i64);
        let (vx, vy) = (viewport.x as i64, viewport.y as i64);

        let wide = width / size + 2;
        let high = height / size + 2;
        let first = projector.tile_index_for(viewport.x, viewport.y, zoom);

        let mut drawn = 0usize;
        let mut missing = 0usize;
        for tile_x in first.x - 1..=first.x + wide {
            for tile_y in first.y - 1..=first.y + high {
                let ox = tile_x * size - vx;
                let oy = tile_y * size - vy;

                // Skip tiles entirely outside the canvas
                if ox >= width || oy >= height || ox + size <= 0 || oy + size <= 0 {
                    continue;
                }

                match self.tiles.fetch(tile_x, tile_y, zoom) {
                    Some(tile) => {
                        imageops::overlay(canvas, tile.as_ref(), ox, oy);
                        drawn += 1;
                    }
                    None => missing += 1,
                }
            }
        }

        debug!(zoom, drawn, missing, "Background tiles composited");
    }
}
