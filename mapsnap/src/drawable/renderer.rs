//! Drawable rendering boundary and the default tiny-skia renderer.

use image::RgbaImage;
use tiny_skia::{ColorU8, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::types::{Colour, DrawableObject, Geometry};
use crate::coord::LatLong;
use crate::render::{CoordinateTransform, RenderError, RenderFlags};

/// Extra rendering hints passed alongside a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    /// Anti-alias shape edges.
    pub anti_alias: bool,
}

impl RenderContext {
    /// Hints for output that will be printed: full anti-aliasing.
    pub fn high_quality() -> Self {
        Self { anti_alias: true }
    }
}

/// Draws a collection of drawables onto an image.
///
/// The compositor calls this once per render with the full collection.
/// Implementations must place every record with
/// [`CoordinateTransform::screen_position`].
pub trait DrawableRenderer: Send + Sync {
    fn render_all(
        &self,
        surface: &mut RgbaImage,
        drawables: &[DrawableObject],
        transform: &dyn CoordinateTransform,
        flags: RenderFlags,
        context: Option<&RenderContext>,
    ) -> Result<(), RenderError>;
}

/// Vector renderer backed by tiny-skia.
///
/// Points become filled circles `pixel_width` across, polygons are filled
/// and line strings are stroked `pixel_width` wide. Labels, legend and
/// image keys are not drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaDrawableRenderer;

impl DrawableRenderer for SkiaDrawableRenderer {
    fn render_all(
        &self,
        surface: &mut RgbaImage,
        drawables: &[DrawableObject],
        transform: &dyn CoordinateTransform,
        flags: RenderFlags,
        context: Option<&RenderContext>,
    ) -> Result<(), RenderError> {
        if drawables.is_empty() {
            return Ok(());
        }

        let (width, height) = surface.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::RenderingFailed(format!(
                "cannot allocate {}×{} drawing surface",
                width, height
            ))
        })?;
        copy_into_pixmap(surface, &mut pixmap);

        let anti_alias = context.is_some_and(|c| c.anti_alias);
        for drawable in drawables {
            draw_one(&mut pixmap, drawable, transform, flags, anti_alias);
        }

        copy_from_pixmap(&pixmap, surface);
        Ok(())
    }
}

fn draw_one(
    pixmap: &mut Pixmap,
    drawable: &DrawableObject,
    transform: &dyn CoordinateTransform,
    flags: RenderFlags,
    anti_alias: bool,
) {
    let faded = flags.contains(RenderFlags::RENDER_FADE) && !drawable.opaque;
    let fill = paint_for(drawable.colour, faded, anti_alias);
    let outline = drawable
        .draw_outline
        .then(|| paint_for(Colour::BLACK, faded, anti_alias));
    let width = drawable.pixel_width.max(1) as f32;

    match drawable.geometry.as_deref() {
        None => {
            let at = transform.screen_position(drawable.position());
            if let Some(circle) = PathBuilder::from_circle(at.x as f32, at.y as f32, width / 2.0) {
                pixmap.fill_path(&circle, &fill, FillRule::Winding, Transform::identity(), None);
                if let Some(outline) = &outline {
                    stroke(pixmap, &circle, outline, 1.0);
                }
            }
        }
        Some(Geometry::Polygon(points)) => {
            if let Some(path) = screen_path(points, transform, true) {
                pixmap.fill_path(&path, &fill, FillRule::EvenOdd, Transform::identity(), None);
                if let Some(outline) = &outline {
                    stroke(pixmap, &path, outline, 1.0);
                }
            }
        }
        Some(Geometry::LineString(points)) => {
            if let Some(path) = screen_path(points, transform, false) {
                if let Some(outline) = &outline {
                    stroke(pixmap, &path, outline, width + 2.0);
                }
                stroke(pixmap, &path, &fill, width);
            }
        }
    }
}

fn paint_for(colour: Colour, faded: bool, anti_alias: bool) -> Paint<'static> {
    let alpha = if faded {
        colour.alpha() / 2
    } else {
        colour.alpha()
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(colour.red(), colour.green(), colour.blue(), alpha);
    paint.anti_alias = anti_alias;
    paint
}

fn stroke(pixmap: &mut Pixmap, path: &Path, paint: &Paint, width: f32) {
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, paint, &stroke, Transform::identity(), None);
}

fn screen_path(points: &[LatLong], transform: &dyn CoordinateTransform, close: bool) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for (i, point) in points.iter().enumerate() {
        let at = transform.screen_position(*point);
        if i == 0 {
            builder.move_to(at.x as f32, at.y as f32);
        } else {
            builder.line_to(at.x as f32, at.y as f32);
        }
    }
    if close {
        builder.close();
    }
    builder.finish()
}

fn copy_into_pixmap(src: &RgbaImage, dst: &mut Pixmap) {
    for (pixel, out) in src.pixels().zip(dst.pixels_mut()) {
        let [r, g, b, a] = pixel.0;
        *out = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
}

fn copy_from_pixmap(src: &Pixmap, dst: &mut RgbaImage) {
    for (pixel, out) in src.pixels().iter().zip(dst.pixels_mut()) {
        let c = pixel.demultiply();
        out.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::coord::{GeoProjector, PixelPoint};
    use crate::render::{base_image, SnapshotTransform};

    const RED: Colour = Colour::from_rgba(255, 0, 0, 255);

    /// 100×100 canvas centred on (0, 0) at zoom 2.
    fn transform() -> SnapshotTransform {
        SnapshotTransform::new(GeoProjector::default(), PixelPoint::new(512.0, 512.0), 100, 100, 2)
    }

    fn render(drawables: &[DrawableObject], flags: RenderFlags) -> RgbaImage {
        let mut surface = base_image(100, 100, RenderFlags::empty());
        SkiaDrawableRenderer
            .render_all(&mut surface, drawables, &transform(), flags, None)
            .unwrap();
        surface
    }

    #[test]
    fn test_point_drawn_at_screen_position() {
        let point = DrawableObject::point(1, 0.0, 0.0).with_colour(RED).with_pixel_width(10);
        let image = render(&[point], RenderFlags::empty());

        assert_eq!(image.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_fade_halves_alpha_unless_opaque() {
        let point = DrawableObject::point(1, 0.0, 0.0).with_colour(RED).with_pixel_width(10);

        let faded = render(&[point.clone()], RenderFlags::RENDER_FADE);
        let g = faded.get_pixel(50, 50).0[1];
        assert!((100..=160).contains(&g), "expected a pink blend, got green={}", g);

        let opaque = render(&[point.with_opaque(true)], RenderFlags::RENDER_FADE);
        assert_eq!(opaque.get_pixel(50, 50).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_polygon_filled() {
        let t = transform();
        let p = GeoProjector::default();
        // Square covering screen pixels 30..70 on both axes
        let corner = |x: f64, y: f64| {
            let v = t.viewport();
            p.lat_long_for(PixelPoint::new(v.x + x, v.y + y), 2)
        };
        let square = Arc::new(Geometry::Polygon(vec![
            corner(30.0, 30.0),
            corner(70.0, 30.0),
            corner(70.0, 70.0),
            corner(30.0, 70.0),
        ]));
        let shape = DrawableObject::shape(2, square).with_colour(RED);
        let image = render(&[shape], RenderFlags::empty());

        assert_eq!(image.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(80, 80).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_line_string_stroked() {
        let line = Arc::new(Geometry::LineString(vec![
            LatLong::new(0.0, -20.0),
            LatLong::new(0.0, 20.0),
        ]));
        let shape = DrawableObject::shape(3, line).with_colour(RED).with_pixel_width(4);
        let image = render(&[shape], RenderFlags::empty());

        assert_eq!(image.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(50, 40).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_empty_collection_leaves_surface_untouched() {
        let image = render(&[], RenderFlags::RENDER_FADE);
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_high_quality_context() {
        assert!(RenderContext::high_quality().anti_alias);
        assert!(!RenderContext::default().anti_alias);
    }
}
