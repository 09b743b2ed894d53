//! Blocking tile download with a bounded retry loop.

use image::RgbaImage;
use tracing::{debug, warn};

use crate::provider::{HttpClient, ProviderError};

/// Number of download attempts made for one tile before giving up.
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Downloads and decodes the tile at `url`.
///
/// Each attempt performs one GET and one decode. Transport errors, empty
/// bodies and undecodable bodies all consume an attempt. There is no delay
/// between attempts. Returns `None` once every attempt has failed.
pub fn load_tile(client: &dyn HttpClient, url: &str) -> Option<RgbaImage> {
    for attempt in 1..=MAX_FETCH_ATTEMPTS {
        match fetch_once(client, url) {
            Ok(image) => {
                debug!(url = %url, attempt, "Tile downloaded");
                return Some(image);
            }
            Err(e) => {
                debug!(url = %url, attempt, error = %e, "Tile download attempt failed");
            }
        }
    }

    warn!(url = %url, attempts = MAX_FETCH_ATTEMPTS, "Giving up on tile");
    None
}

fn fetch_once(client: &dyn HttpClient, url: &str) -> Result<RgbaImage, ProviderError> {
    let body = client.get(url)?;
    if body.is_empty() {
        return Err(ProviderError::EmptyBody(url.to_string()));
    }

    image::load_from_memory(&body)
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| ProviderError::DecodeError(e.to_string()))
}
