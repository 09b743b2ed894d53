//! Render flag set and base canvas creation.

use bitflags::bitflags;
use image::{Rgba, RgbaImage};

use super::RenderError;

/// Default ceiling on one canvas's RGBA buffer: 1 GiB.
pub const DEFAULT_MAX_CANVAS_BYTES: u64 = 1024 * 1024 * 1024;

bitflags! {
    /// Options selecting what a render call draws.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderFlags: u32 {
        /// Draw background map tiles.
        const SHOW_BACKGROUND = 1 << 0;
        /// Draw non-opaque drawables semi-transparent.
        const RENDER_FADE = 1 << 1;
        /// Start from a transparent canvas instead of opaque white.
        const TRANSPARENT_BASE = 1 << 2;
    }
}

/// Checks that a `width` × `height` RGBA canvas is non-empty and fits in
/// `max_bytes`.
pub fn check_canvas(width: u32, height: u32, max_bytes: u64) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::RenderingFailed(format!(
            "empty canvas {}×{}",
            width, height
        )));
    }

    let bytes = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(4))
        .filter(|bytes| *bytes <= max_bytes && usize::try_from(*bytes).is_ok());
    match bytes {
        Some(_) => Ok(()),
        None => Err(RenderError::RenderingFailed(format!(
            "canvas {}×{} exceeds the {} byte limit",
            width, height, max_bytes
        ))),
    }
}

/// Creates the empty canvas every render starts from.
///
/// Callers validate the size with [`check_canvas`] first.
pub fn base_image(width: u32, height: u32, flags: RenderFlags) -> RgbaImage {
    let fill = if flags.contains(RenderFlags::TRANSPARENT_BASE) {
        Rgba([0, 0, 0, 0])
    } else {
        Rgba([255, 255, 255, 255])
    };
    RgbaImage::from_pixel(width, height, fill)
}
