//! Print rendering at a physical size.

mod memo;
mod solver;

pub use memo::{MemoKey, RenderMemo};
pub use solver::{PrintScaleSolver, SourceResolution, CM_PER_INCH, DEFAULT_SOURCE_DPI};
