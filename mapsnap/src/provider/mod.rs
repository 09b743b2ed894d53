//! Raster tile provider abstraction
//!
//! A [`TileProvider`] turns a tile address into a URL; an [`HttpClient`]
//! performs the blocking GET. Keeping the two apart lets tests swap the
//! network for a scripted client.
//!
//! ```ignore
//! use mapsnap::provider::{OsmTileProvider, ReqwestClient, TileProvider};
//!
//! let provider = OsmTileProvider::new();
//! let client = ReqwestClient::new()?;
//! let url = provider.tile_url(0, 0, 0);
//! ```

mod http;
mod osm;
mod types;

pub use http::{HttpClient, ReqwestClient, DEFAULT_USER_AGENT};
pub use osm::{OsmTileProvider, TemplateTileProvider, OSM_TILE_TEMPLATE};
pub use types::{ProviderError, TileProvider};

#[cfg(test)]
pub use http::tests::{png_bytes, ScriptedHttpClient};
