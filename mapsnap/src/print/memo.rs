//! Memoization of upscaled print backgrounds.
//!
//! Upscaling a background to print resolution is the most expensive step of
//! a print render. Repeated prints of the same view reuse the result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use moka::sync::Cache;
use tracing::trace;

use crate::coord::PixelPoint;

/// Identifies one upscaled background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoKey {
    centre_x_bits: u64,
    centre_y_bits: u64,
    source_size: (u32, u32),
    zoom: u8,
    final_size: (u32, u32),
}

impl MemoKey {
    /// Key for a background rendered at `source_size` around world pixel
    /// `centre` and resized to `final_size`.
    pub fn new(centre: PixelPoint, source_size: (u32, u32), zoom: u8, final_size: (u32, u32)) -> Self {
        Self {
            centre_x_bits: centre.x.to_bits(),
            centre_y_bits: centre.y.to_bits(),
            source_size,
            zoom,
            final_size,
        }
    }
}

/// Bounded cache of rendered print backgrounds.
///
/// Entries are weighted by pixel buffer size and evicted least-recently
/// used first; a miss simply means the caller renders again.
pub struct RenderMemo {
    cache: Cache<MemoKey, Arc<RgbaImage>>,
    max_size_bytes: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RenderMemo {
    /// An empty memo holding at most `max_size_bytes` of pixel data.
    pub fn new(max_size_bytes: u64) -> Self {
        let cache = Cache::builder()
            .weigher(|_key: &MemoKey, image: &Arc<RgbaImage>| -> u32 {
                image.as_raw().len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self {
            cache,
            max_size_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up a background, counting the hit or miss.
    pub fn get(&self, key: &MemoKey) -> Option<Arc<RgbaImage>> {
        match self.cache.get(key) {
            Some(image) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(?key, "Render memo hit");
                Some(image)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Stores a background, possibly evicting older ones.
    pub fn put(&self, key: MemoKey, image: RgbaImage) {
        self.cache.insert(key, Arc::new(image));
    }

    /// Lookups that found a background.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Backgrounds currently held.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Pixel bytes currently held.
    pub fn size_bytes(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.weighted_size()
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}
