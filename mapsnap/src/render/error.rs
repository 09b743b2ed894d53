//! Error types for rendering operations.

use thiserror::Error;

/// Errors surfaced by the render pipeline.
///
/// Tile download failures never appear here; they degrade to blank cells.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The operation is not available on this kind of object.
    #[error("Not supported in this context: {0}")]
    Unsupported(&'static str),

    /// Any other failure while producing an image.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::RenderingFailed(e.to_string())
    }
}
