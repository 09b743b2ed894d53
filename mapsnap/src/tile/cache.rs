//! In-memory tile cache with LRU eviction using moka.
//!
//! Tiles are keyed by their source URL and stored decoded, weighted by
//! their raw RGBA byte length. A failed download is never cached, so the
//! next request for the same tile retries from scratch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::loader::load_tile;
use crate::coord::GeoProjector;
use crate::provider::{HttpClient, TileProvider};

/// Point-in-time counters for a [`TileCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Misses whose download exhausted every attempt.
    pub failed_fetches: u64,
    pub entry_count: u64,
    pub size_bytes: u64,
}

/// Fetches and memoizes decoded raster tiles.
///
/// All fetches on one instance are serialized: a call blocks until any
/// in-flight fetch on the same cache has completed, including its network
/// I/O.
pub struct TileCache {
    provider: Arc<dyn TileProvider>,
    client: Arc<dyn HttpClient>,
    projector: GeoProjector,
    cache: Cache<String, Arc<RgbaImage>>,
    max_size_bytes: u64,
    fetch_lock: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    failed_fetches: AtomicU64,
}

impl TileCache {
    /// Creates a tile cache holding at most `max_size_bytes` of decoded pixels.
    pub fn new(
        provider: Arc<dyn TileProvider>,
        client: Arc<dyn HttpClient>,
        max_size_bytes: u64,
    ) -> Self {
        let cache = Cache::builder()
            // Weight each entry by its pixel buffer size
            .weigher(|_url: &String, tile: &Arc<RgbaImage>| -> u32 {
                tile.as_raw().len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        let projector = GeoProjector::new(provider.tile_size(0));

        Self {
            provider,
            client,
            projector,
            cache,
            max_size_bytes,
            fetch_lock: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            failed_fetches: AtomicU64::new(0),
        }
    }

    /// Projector matching the provider's tile pyramid.
    pub fn projector(&self) -> GeoProjector {
        self.projector
    }

    /// The tile source this cache reads from.
    pub fn provider(&self) -> &dyn TileProvider {
        self.provider.as_ref()
    }

    /// Returns the tile at (`tile_x`, `tile_y`, `zoom`), downloading it on a miss.
    ///
    /// The column is wrapped around the world width before the URL is
    /// built. Rows outside the pyramid and unsupported zoom levels yield
    /// `None` without any network I/O, as does a download that fails every
    /// attempt.
    pub fn fetch(&self, tile_x: i64, tile_y: i64, zoom: u8) -> Option<Arc<RgbaImage>> {
        let _guard = self.fetch_lock.lock();

        if !self.provider.supports_zoom(zoom) {
            debug!(zoom, provider = self.provider.name(), "Zoom not served by provider");
            return None;
        }
        if tile_y < 0 || tile_y >= self.projector.tile_count_high(zoom) {
            trace!(tile_y, zoom, "Tile row outside the world");
            return None;
        }

        let x = self.projector.wrap_tile_x(tile_x, zoom);
        let url = self.provider.tile_url(x, tile_y, zoom);

        if let Some(tile) = self.cache.get(&url) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Tile cache hit");
            return Some(tile);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match load_tile(self.client.as_ref(), &url) {
            Some(image) => {
                let tile = Arc::new(image);
                self.cache.insert(url, Arc::clone(&tile));
                Some(tile)
            }
            None => {
                self.failed_fetches.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Check whether the tile URL for the given address is cached.
    pub fn contains(&self, tile_x: i64, tile_y: i64, zoom: u8) -> bool {
        let x = self.projector.wrap_tile_x(tile_x, zoom);
        self.cache.contains_key(&self.provider.tile_url(x, tile_y, zoom))
    }

    /// Get the current number of cached tiles.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Get the maximum size of the cache in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Get cache statistics.
    pub fn stats(&self) -> TileCacheStats {
        self.cache.run_pending_tasks();
        TileCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            entry_count: self.cache.entry_count(),
            size_bytes: self.cache.weighted_size(),
        }
    }

    /// Drop every cached tile.
    pub fn clear(&self) {
        let _guard = self.fetch_lock.lock();
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}
