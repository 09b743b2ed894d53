//! Physically-scaled print rendering.
//!
//! Tile servers draw their labels and roads for an unknown screen
//! resolution. Printing a background at a readable physical size means
//! guessing that resolution: the solver tries each assumed source DPI,
//! keeps the one whose canvas the view fills best, renders at that source
//! size and resizes to the requested output resolution.

use std::ops::RangeInclusive;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use parking_lot::Mutex;
use tracing::debug;

use super::memo::{MemoKey, RenderMemo};
use crate::drawable::{DrawableObject, RenderContext};
use crate::fit::{BitmapView, View, ZoomFitSolver};
use crate::render::{base_image, check_canvas, RenderError, RenderFlags, ScaledTransform, ViewportCompositor};

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Assumed tile-server resolutions searched by default, in dots per inch.
pub const DEFAULT_SOURCE_DPI: RangeInclusive<u32> = 80..=110;

/// The winning source-resolution assumption for one print.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceResolution {
    pub dpi: u32,
    pub dots_per_cm: f64,
    pub width: u32,
    pub height: u32,
    pub view: BitmapView,
}

/// Renders views at a physical size and output resolution.
///
/// Calls are serialized per instance.
pub struct PrintScaleSolver {
    compositor: Arc<ViewportCompositor>,
    fit: ZoomFitSolver,
    memo: RenderMemo,
    fit_fraction: f64,
    source_dpi: RangeInclusive<u32>,
    lock: Mutex<()>,
}

impl PrintScaleSolver {
    pub fn new(
        compositor: Arc<ViewportCompositor>,
        fit: ZoomFitSolver,
        memo: RenderMemo,
        fit_fraction: f64,
        source_dpi: RangeInclusive<u32>,
    ) -> Self {
        Self {
            compositor,
            fit,
            memo,
            fit_fraction,
            source_dpi,
            lock: Mutex::new(()),
        }
    }

    pub fn memo(&self) -> &RenderMemo {
        &self.memo
    }

    /// Picks the assumed source DPI whose canvas `view` fills best.
    ///
    /// Candidates are tried in ascending order and only a strictly better
    /// quality replaces the current choice, so the lowest DPI wins ties.
    pub fn choose_source(&self, view: &View, width_cm: f64, height_cm: f64) -> SourceResolution {
        let mut best: Option<SourceResolution> = None;

        for dpi in self.source_dpi.clone() {
            let dots_per_cm = dpi as f64 / CM_PER_INCH;
            let width = (width_cm * dots_per_cm).round() as u32;
            let height = (height_cm * dots_per_cm).round() as u32;
            let bitmap_view = self.fit.bitmap_view(view, width, height, self.fit_fraction);

            let candidate = SourceResolution {
                dpi,
                dots_per_cm,
                width,
                height,
                view: bitmap_view,
            };
            match &best {
                Some(current) if candidate.view.fit_quality <= current.view.fit_quality => {}
                _ => best = Some(candidate),
            }
        }

        // An empty DPI range degrades to the first default candidate
        best.unwrap_or_else(|| {
            let dpi = *DEFAULT_SOURCE_DPI.start();
            let dots_per_cm = dpi as f64 / CM_PER_INCH;
            let width = (width_cm * dots_per_cm).round() as u32;
            let height = (height_cm * dots_per_cm).round() as u32;
            SourceResolution {
                dpi,
                dots_per_cm,
                width,
                height,
                view: self.fit.bitmap_view(view, width, height, self.fit_fraction),
            }
        })
    }

    /// Renders `view` for printing at `width_cm` × `height_cm` and
    /// `dots_per_cm`.
    ///
    /// The image is exactly `round(width_cm * dots_per_cm)` ×
    /// `round(height_cm * dots_per_cm)` pixels. Drawables are painted on
    /// the final canvas with anti-aliasing, never upscaled.
    pub fn render_printable(
        &self,
        view: &View,
        width_cm: f64,
        height_cm: f64,
        dots_per_cm: f64,
        drawables: Option<&[DrawableObject]>,
        flags: RenderFlags,
    ) -> Result<(RgbaImage, ScaledTransform), RenderError> {
        let _guard = self.lock.lock();

        for (name, value) in [("width", width_cm), ("height", height_cm), ("resolution", dots_per_cm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RenderError::RenderingFailed(format!(
                    "invalid print {}: {}",
                    name, value
                )));
            }
        }

        let final_size = (
            print_pixels(width_cm, dots_per_cm)?,
            print_pixels(height_cm, dots_per_cm)?,
        );
        check_canvas(final_size.0, final_size.1, self.compositor.max_canvas_bytes())?;

        let source = self.choose_source(view, width_cm, height_cm);

        debug!(
            dpi = source.dpi,
            zoom = source.view.zoom,
            quality = source.view.fit_quality,
            source_width = source.width,
            source_height = source.height,
            final_width = final_size.0,
            final_height = final_size.1,
            "Print source resolution chosen"
        );

        let mut image = if flags.contains(RenderFlags::SHOW_BACKGROUND) {
            self.background(&source, final_size)?
        } else {
            base_image(final_size.0, final_size.1, flags)
        };

        let unscaled = self.compositor.transform_for(
            source.view.centre,
            source.width,
            source.height,
            source.view.zoom,
        );
        let transform = ScaledTransform::new(unscaled, dots_per_cm / source.dots_per_cm);

        if let Some(drawables) = drawables {
            self.compositor.renderer().render_all(
                &mut image,
                drawables,
                &transform,
                flags,
                Some(&RenderContext::high_quality()),
            )?;
        }

        Ok((image, transform))
    }

    fn background(&self, source: &SourceResolution, final_size: (u32, u32)) -> Result<RgbaImage, RenderError> {
        let key = MemoKey::new(
            source.view.centre,
            (source.width, source.height),
            source.view.zoom,
            final_size,
        );
        if let Some(cached) = self.memo.get(&key) {
            return Ok(cached.as_ref().clone());
        }

        let (raw, _) = self.compositor.compose(
            source.view.centre,
            source.width,
            source.height,
            source.view.zoom,
            RenderFlags::SHOW_BACKGROUND,
            None,
        )?;
        let scaled = imageops::resize(&raw, final_size.0, final_size.1, FilterType::Lanczos3);
        self.memo.put(key, scaled.clone());
        Ok(scaled)
    }
}

/// Pixel count along one printed edge, `round(cm * dots_per_cm)`.
fn print_pixels(cm: f64, dots_per_cm: f64) -> Result<u32, RenderError> {
    let pixels = (cm * dots_per_cm).round();
    if !pixels.is_finite() || pixels < 1.0 || pixels > u32::MAX as f64 {
        return Err(RenderError::RenderingFailed(format!(
            "{} cm at {} dots/cm is not a drawable pixel count",
            cm, dots_per_cm
        )));
    }
    Ok(pixels as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::LatLong;
    use crate::drawable::{Colour, SkiaDrawableRenderer};
    use crate::fit::DEFAULT_FIT_FRACTION;
    use crate::provider::{png_bytes, ScriptedHttpClient, TemplateTileProvider, TileProvider};
    use crate::render::CoordinateTransform;
    use crate::tile::TileCache;

    fn solver_with(client: Arc<ScriptedHttpClient>) -> PrintScaleSolver {
        let provider: Arc<dyn TileProvider> =
            Arc::new(TemplateTileProvider::new("test", "http://t/{z}/{x}/{y}.png", 18));
        let fit = ZoomFitSolver::for_provider(provider.as_ref());
        let tiles = Arc::new(TileCache::new(provider, client, 256 * 1024 * 1024));
        let compositor = Arc::new(ViewportCompositor::new(tiles, Arc::new(SkiaDrawableRenderer)));
        PrintScaleSolver::new(
            compositor,
            fit,
            RenderMemo::new(256 * 1024 * 1024),
            DEFAULT_FIT_FRACTION,
            DEFAULT_SOURCE_DPI,
        )
    }

    fn green_tiles() -> Arc<ScriptedHttpClient> {
        Arc::new(ScriptedHttpClient::new(vec![], Ok(png_bytes(256, 256, [0, 160, 0, 255]))))
    }

    fn london() -> View {
        View::from_bounds(51.3, 51.7, -0.5, 0.3)
    }

    #[test]
    fn test_print_size_is_exact() {
        let solver = solver_with(green_tiles());

        let (image, _) = solver
            .render_printable(&london(), 10.0, 10.0, 40.0, None, RenderFlags::SHOW_BACKGROUND)
            .unwrap();
        assert_eq!(image.dimensions(), (400, 400));
        let [r, g, b, a] = image.get_pixel(200, 200).0;
        assert!(r <= 1 && (158..=162).contains(&g) && b <= 1 && a >= 254);

        let (blank, _) = solver
            .render_printable(&london(), 10.0, 10.0, 40.0, None, RenderFlags::empty())
            .unwrap();
        assert_eq!(blank.dimensions(), (400, 400));
    }

    #[test]
    fn test_odd_sizes_round() {
        let solver = solver_with(green_tiles());
        let (image, _) = solver
            .render_printable(&london(), 21.0, 29.7, 11.811, None, RenderFlags::empty())
            .unwrap();
        assert_eq!(image.dimensions(), (248, 351));
    }

    #[test]
    fn test_choose_source_maximises_quality() {
        let solver = solver_with(green_tiles());
        let view = london();
        let chosen = solver.choose_source(&view, 10.0, 10.0);

        assert!(DEFAULT_SOURCE_DPI.contains(&chosen.dpi));
        for dpi in DEFAULT_SOURCE_DPI {
            let dots = dpi as f64 / CM_PER_INCH;
            let size = (10.0 * dots).round() as u32;
            let q = solver.fit.bitmap_view(&view, size, size, DEFAULT_FIT_FRACTION).fit_quality;
            assert!(q <= chosen.view.fit_quality);
            if dpi < chosen.dpi {
                assert!(q < chosen.view.fit_quality, "earlier dpi {} ties the winner", dpi);
            }
        }
        assert_eq!(chosen.width, (10.0 * chosen.dots_per_cm).round() as u32);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let solver = solver_with(green_tiles());
        // A zero-area view scores 0 at every candidate
        let point = View::from_bounds(10.0, 10.0, 10.0, 10.0);
        assert_eq!(solver.choose_source(&point, 5.0, 5.0).dpi, 80);
    }

    #[test]
    fn test_transform_carries_scale_factor() {
        let solver = solver_with(green_tiles());
        let (_, transform) = solver
            .render_printable(&london(), 10.0, 10.0, 40.0, None, RenderFlags::empty())
            .unwrap();
        let source = solver.choose_source(&london(), 10.0, 10.0);

        assert!((transform.scale_factor() - 40.0 / source.dots_per_cm).abs() < 1e-12);
        assert_eq!(transform.unscaled().zoom(), source.view.zoom);
    }

    #[test]
    fn test_background_memoized() {
        let client = green_tiles();
        let solver = solver_with(client.clone());

        solver
            .render_printable(&london(), 10.0, 10.0, 40.0, None, RenderFlags::SHOW_BACKGROUND)
            .unwrap();
        let requests = client.request_count();
        assert!(requests > 0);

        solver.compositor.tiles().clear();
        solver
            .render_printable(&london(), 10.0, 10.0, 40.0, None, RenderFlags::SHOW_BACKGROUND)
            .unwrap();

        assert_eq!(client.request_count(), requests, "second print must reuse the memo");
        assert_eq!(solver.memo().hits(), 1);
    }

    #[test]
    fn test_drawables_painted_at_final_resolution() {
        let solver = solver_with(green_tiles());
        let view = london();
        let marker = DrawableObject::point(1, view.centre.latitude, view.centre.longitude)
            .with_colour(Colour::from_rgba(255, 0, 0, 255))
            .with_pixel_width(20);

        let (image, transform) = solver
            .render_printable(&view, 10.0, 10.0, 40.0, Some(std::slice::from_ref(&marker)), RenderFlags::SHOW_BACKGROUND)
            .unwrap();

        let at = transform.screen_position(LatLong::new(view.centre.latitude, view.centre.longitude));
        assert!((at.x - 200.0).abs() < 3.0 && (at.y - 200.0).abs() < 3.0, "{:?}", at);
        assert_eq!(image.get_pixel(at.x as u32, at.y as u32).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let solver = solver_with(green_tiles());
        for (w, h, d) in [(0.0, 10.0, 40.0), (10.0, -1.0, 40.0), (10.0, 10.0, f64::NAN)] {
            let result = solver.render_printable(&london(), w, h, d, None, RenderFlags::empty());
            assert!(matches!(result, Err(RenderError::RenderingFailed(_))));
        }
    }

    #[test]
    fn test_unrepresentable_sizes_rejected() {
        let solver = solver_with(green_tiles());
        let cases = [
            // Far beyond the canvas budget and u32 pixel counts
            (1e6, 1e6, 1e4, RenderFlags::empty()),
            (1e6, 1e6, 1e4, RenderFlags::SHOW_BACKGROUND),
            (1e300, 10.0, 1e300, RenderFlags::empty()),
            // Rounds to zero pixels
            (0.01, 10.0, 10.0, RenderFlags::empty()),
            // Output fits but the assumed-source background does not
            (10_000.0, 10_000.0, 1.0, RenderFlags::SHOW_BACKGROUND),
        ];

        for (w, h, d, flags) in cases {
            let result = solver.render_printable(&london(), w, h, d, None, flags);
            assert!(
                matches!(result, Err(RenderError::RenderingFailed(_))),
                "{} × {} cm at {} dots/cm",
                w,
                h,
                d
            );
        }
    }

    #[test]
    fn test_print_pixels_rounds() {
        assert_eq!(print_pixels(10.0, 40.0).unwrap(), 400);
        assert_eq!(print_pixels(21.0, 11.811).unwrap(), 248);
        assert!(print_pixels(0.01, 10.0).is_err());
        assert!(print_pixels(1e6, 1e6).is_err());
    }
}
