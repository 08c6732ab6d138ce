// Catalog - Mood Query, Search and Sanitization
//
// (emotion, genre) → SearchQuery → collection search → first usable
// collection → item listing → sanitized Tracks.
//
// Raw catalog bodies are untrusted `serde_json::Value`s. `sanitizer` is the
// only code that looks inside them.

use crate::error::MoodResult;
use async_trait::async_trait;
use serde_json::Value;

pub mod query;
pub mod recommender;
pub mod sanitizer;
pub mod spotify_client;

pub use query::{mood_term, SearchQuery, FALLBACK_TERM};
pub use recommender::Recommender;
pub use spotify_client::SpotifyClient;

/// Music catalog search seam
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search collections (playlists) matching `query`; body returned untouched
    async fn search_collections(
        &self,
        query: &str,
        limit: u32,
        market: Option<&str>,
    ) -> MoodResult<Value>;

    /// List the items of one collection; body returned untouched
    async fn list_items(&self, collection_id: &str, limit: u32) -> MoodResult<Value>;
}
