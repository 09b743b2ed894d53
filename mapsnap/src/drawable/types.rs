//! Drawable records and their style attributes.

use std::sync::Arc;

use crate::coord::LatLong;

/// A colour packed as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl Colour {
    pub const BLACK: Colour = Colour(0xFF00_0000);
    pub const WHITE: Colour = Colour(0xFFFF_FFFF);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Colour(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::BLACK
    }
}

/// Shape payload of a drawable.
///
/// Geometries are shared behind an [`Arc`] and never mutated once shared;
/// an edit replaces the whole `Arc`. Change detection relies on this and
/// compares geometries by pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    LineString(Vec<LatLong>),
    Polygon(Vec<LatLong>),
}

impl Geometry {
    pub fn points(&self) -> &[LatLong] {
        match self {
            Geometry::LineString(points) | Geometry::Polygon(points) => points,
        }
    }
}

/// A styled point or shape with a stable identity.
///
/// Several records may share one `global_row_id`; together they form the
/// id's group.
#[derive(Debug, Clone, Default)]
pub struct DrawableObject {
    pub global_row_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub geometry: Option<Arc<Geometry>>,
    pub colour: Colour,
    pub colour_key: String,
    pub draw_outline: bool,
    pub image_formula_key: String,
    pub legend_key: String,
    pub label: String,
    pub font_size: u32,
    pub pixel_width: u32,
    pub opaque: bool,
}

impl DrawableObject {
    /// A point drawable with default styling.
    pub fn point(global_row_id: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            global_row_id,
            latitude,
            longitude,
            pixel_width: 8,
            font_size: 10,
            ..Default::default()
        }
    }

    /// A shape drawable; its position is the first vertex, if any.
    pub fn shape(global_row_id: i64, geometry: Arc<Geometry>) -> Self {
        let anchor = geometry.points().first().copied().unwrap_or(LatLong::new(0.0, 0.0));
        Self {
            geometry: Some(geometry),
            ..Self::point(global_row_id, anchor.latitude, anchor.longitude)
        }
    }

    pub fn position(&self) -> LatLong {
        LatLong::new(self.latitude, self.longitude)
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_pixel_width(mut self, pixel_width: u32) -> Self {
        self.pixel_width = pixel_width;
        self
    }

    pub fn with_outline(mut self, draw_outline: bool) -> Self {
        self.draw_outline = draw_outline;
        self
    }

    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    /// Returns whether both records would draw identically.
    ///
    /// Every attribute is compared; geometry by `Arc` identity, floats with
    /// plain `==`.
    pub fn same_drawing_as(&self, other: &DrawableObject) -> bool {
        let same_geometry = match (&self.geometry, &other.geometry) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };

        self.latitude == other.latitude
            && self.longitude == other.longitude
            && same_geometry
            && self.colour == other.colour
            && self.colour_key == other.colour_key
            && self.draw_outline == other.draw_outline
            && self.image_formula_key == other.image_formula_key
            && self.legend_key == other.legend_key
            && self.label == other.label
            && self.font_size == other.font_size
            && self.pixel_width == other.pixel_width
            && self.opaque == other.opaque
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_packing() {
        let c = Colour::from_rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.0, 0x7812_3456);
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0x12, 0x34, 0x56, 0x78));
    }

    #[test]
    fn test_same_drawing_ignores_id() {
        let a = DrawableObject::point(1, 51.5, -0.1).with_label("depot");
        let mut b = a.clone();
        b.global_row_id = 2;
        assert!(a.same_drawing_as(&b));
    }

    #[test]
    fn test_each_attribute_is_compared() {
        let base = DrawableObject::point(1, 51.5, -0.1);
        let variants: Vec<DrawableObject> = vec![
            DrawableObject { latitude: 51.6, ..base.clone() },
            DrawableObject { longitude: 0.0, ..base.clone() },
            base.clone().with_colour(Colour::WHITE),
            DrawableObject { colour_key: "k".into(), ..base.clone() },
            base.clone().with_outline(true),
            DrawableObject { image_formula_key: "img".into(), ..base.clone() },
            DrawableObject { legend_key: "legend".into(), ..base.clone() },
            base.clone().with_label("x"),
            DrawableObject { font_size: 99, ..base.clone() },
            base.clone().with_pixel_width(1),
            base.clone().with_opaque(true),
        ];

        for variant in variants {
            assert!(!base.same_drawing_as(&variant), "{:?}", variant);
        }
    }

    #[test]
    fn test_geometry_compared_by_reference() {
        let points = vec![LatLong::new(0.0, 0.0), LatLong::new(1.0, 1.0)];
        let shared = Arc::new(Geometry::LineString(points.clone()));
        let a = DrawableObject::shape(5, Arc::clone(&shared));
        let b = DrawableObject::shape(5, Arc::clone(&shared));
        let c = DrawableObject::shape(5, Arc::new(Geometry::LineString(points)));

        assert!(a.same_drawing_as(&b));
        assert!(!a.same_drawing_as(&c), "equal payloads behind different Arcs differ");
    }

    #[test]
    fn test_shape_anchors_on_first_vertex() {
        let geometry = Arc::new(Geometry::Polygon(vec![
            LatLong::new(10.0, 20.0),
            LatLong::new(11.0, 20.0),
            LatLong::new(11.0, 21.0),
        ]));
        let shape = DrawableObject::shape(3, geometry);
        assert_eq!(shape.position(), LatLong::new(10.0, 20.0));
    }
}
