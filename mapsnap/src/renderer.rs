//! The synchronous renderer most callers start from.

use std::sync::Arc;

use image::RgbaImage;
use tracing::info;

use crate::config::RendererConfig;
use crate::coord::{GeoProjector, PixelPoint};
use crate::drawable::{DrawableObject, DrawableRenderer, SkiaDrawableRenderer};
use crate::fit::{BitmapView, View, ZoomFitSolver};
use crate::print::{PrintScaleSolver, RenderMemo};
use crate::provider::{HttpClient, OsmTileProvider, ProviderError, ReqwestClient, TileProvider};
use crate::render::{RenderError, RenderFlags, ScaledTransform, SnapshotTransform, ViewportCompositor};
use crate::tile::TileCache;

/// One-shot map snapshot renderer.
///
/// Owns the tile cache, compositor, zoom fit solver and print solver for a
/// single tile provider. Every draw call blocks until the image is
/// complete, fetching any missing tiles on the calling thread.
///
/// # Example
///
/// ```ignore
/// use mapsnap::{MapSnapshotRenderer, RenderFlags, RendererConfig, View};
///
/// let renderer = MapSnapshotRenderer::openstreetmap(RendererConfig::default())?;
/// let view = View::from_bounds(51.3, 51.7, -0.5, 0.3);
/// let (image, transform) =
///     renderer.draw_at_lat_long_centre(&view, 800, 600, RenderFlags::SHOW_BACKGROUND, None)?;
/// ```
pub struct MapSnapshotRenderer {
    config: RendererConfig,
    compositor: Arc<ViewportCompositor>,
    fit: ZoomFitSolver,
    print: PrintScaleSolver,
}

impl MapSnapshotRenderer {
    pub fn new(
        config: RendererConfig,
        provider: Arc<dyn TileProvider>,
        client: Arc<dyn HttpClient>,
        renderer: Arc<dyn DrawableRenderer>,
    ) -> Self {
        let fit = ZoomFitSolver::for_provider(provider.as_ref());
        let provider_name = provider.name().to_string();
        let tiles = Arc::new(TileCache::new(provider, client, config.tile_cache_bytes));
        let compositor = Arc::new(
            ViewportCompositor::new(tiles, renderer).with_max_canvas_bytes(config.max_canvas_bytes),
        );
        let print = PrintScaleSolver::new(
            Arc::clone(&compositor),
            fit,
            RenderMemo::new(config.memo_bytes),
            config.fit_fraction,
            config.source_dpi.clone(),
        );

        info!(
            provider = %provider_name,
            tile_cache_bytes = config.tile_cache_bytes,
            memo_bytes = config.memo_bytes,
            "Map snapshot renderer created"
        );

        Self {
            config,
            compositor,
            fit,
            print,
        }
    }

    /// A renderer over OpenStreetMap tiles fetched with reqwest and drawing
    /// with the tiny-skia renderer.
    pub fn openstreetmap(config: RendererConfig) -> Result<Self, ProviderError> {
        let client = ReqwestClient::with_options(&config.user_agent, config.http_timeout)?;
        Ok(Self::new(
            config,
            Arc::new(OsmTileProvider::new()),
            Arc::new(client),
            Arc::new(SkiaDrawableRenderer),
        ))
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn projector(&self) -> GeoProjector {
        self.compositor.projector()
    }

    pub fn tiles(&self) -> &TileCache {
        self.compositor.tiles()
    }

    pub fn compositor(&self) -> &ViewportCompositor {
        &self.compositor
    }

    pub fn fit_solver(&self) -> &ZoomFitSolver {
        &self.fit
    }

    pub fn print_solver(&self) -> &PrintScaleSolver {
        &self.print
    }

    /// Renders a `width` × `height` image centred on world pixel `centre` at
    /// `zoom`.
    pub fn draw_at_bitmap_centre(
        &self,
        centre: PixelPoint,
        width: u32,
        height: u32,
        zoom: u8,
        flags: RenderFlags,
        drawables: Option<&[DrawableObject]>,
    ) -> Result<(RgbaImage, SnapshotTransform), RenderError> {
        self.compositor
            .compose(centre, width, height, zoom, flags, drawables)
    }

    /// Fits `view` into a `width` × `height` image and renders it around the
    /// view's centre.
    pub fn draw_at_lat_long_centre(
        &self,
        view: &View,
        width: u32,
        height: u32,
        flags: RenderFlags,
        drawables: Option<&[DrawableObject]>,
    ) -> Result<(RgbaImage, SnapshotTransform), RenderError> {
        let bitmap_view = self.bitmap_view(view, width, height);
        self.draw_at_bitmap_centre(
            bitmap_view.centre,
            width,
            height,
            bitmap_view.zoom,
            flags,
            drawables,
        )
    }

    /// Resolves `view` to a zoom and world-pixel centre for a
    /// `width` × `height` image.
    pub fn bitmap_view(&self, view: &View, width: u32, height: u32) -> BitmapView {
        self.fit
            .bitmap_view(view, width, height, self.config.fit_fraction)
    }

    /// Renders `view` at a physical size for printing.
    ///
    /// See [`PrintScaleSolver::render_printable`].
    pub fn draw_printable(
        &self,
        view: &View,
        width_cm: f64,
        height_cm: f64,
        dots_per_cm: f64,
        drawables: Option<&[DrawableObject]>,
        flags: RenderFlags,
    ) -> Result<(RgbaImage, ScaledTransform), RenderError> {
        self.print
            .render_printable(view, width_cm, height_cm, dots_per_cm, drawables, flags)
    }
}
