//! Renderer configuration.
//!
//! `RendererConfig` gathers every tunable of a [`MapSnapshotRenderer`]
//! so all components are built from one consistent source.
//!
//! [`MapSnapshotRenderer`]: crate::MapSnapshotRenderer

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::fit::DEFAULT_FIT_FRACTION;
use crate::print::DEFAULT_SOURCE_DPI;
use crate::provider::DEFAULT_USER_AGENT;
use crate::render::DEFAULT_MAX_CANVAS_BYTES;

/// Default tile cache budget: 256 MiB of decoded pixels.
pub const DEFAULT_TILE_CACHE_BYTES: u64 = 256 * 1024 * 1024;

/// Default print background memo budget: 128 MiB.
pub const DEFAULT_MEMO_BYTES: u64 = 128 * 1024 * 1024;

/// Configuration for a [`MapSnapshotRenderer`](crate::MapSnapshotRenderer).
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    /// Maximum decoded tile bytes held in memory.
    pub tile_cache_bytes: u64,

    /// Maximum upscaled print background bytes held in memory.
    pub memo_bytes: u64,

    /// `User-Agent` sent with every tile request.
    pub user_agent: String,

    /// Per-request HTTP timeout. `None` leaves the HTTP stack default.
    pub http_timeout: Option<Duration>,

    /// Share of the target box a fitted view may occupy.
    pub fit_fraction: f64,

    /// Assumed tile-server resolutions searched when printing.
    pub source_dpi: RangeInclusive<u32>,

    /// Largest RGBA buffer one render may allocate, in bytes.
    pub max_canvas_bytes: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tile_cache_bytes: DEFAULT_TILE_CACHE_BYTES,
            memo_bytes: DEFAULT_MEMO_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: None,
            fit_fraction: DEFAULT_FIT_FRACTION,
            source_dpi: DEFAULT_SOURCE_DPI,
            max_canvas_bytes: DEFAULT_MAX_CANVAS_BYTES,
        }
    }
}

impl RendererConfig {
    pub fn with_tile_cache_bytes(mut self, bytes: u64) -> Self {
        self.tile_cache_bytes = bytes;
        self
    }

    pub fn with_memo_bytes(mut self, bytes: u64) -> Self {
        self.memo_bytes = bytes;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Set the fit fraction, clamped to `(0, 1]`.
    pub fn with_fit_fraction(mut self, fit_fraction: f64) -> Self {
        self.fit_fraction = if fit_fraction.is_finite() && fit_fraction > 0.0 {
            fit_fraction.min(1.0)
        } else {
            DEFAULT_FIT_FRACTION
        };
        self
    }

    pub fn with_source_dpi(mut self, source_dpi: RangeInclusive<u32>) -> Self {
        self.source_dpi = source_dpi;
        self
    }

    pub fn with_max_canvas_bytes(mut self, bytes: u64) -> Self {
        self.max_canvas_bytes = bytes;
        self
    }
}
