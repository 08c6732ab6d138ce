//! Catalog response sanitizer
//!
//! The single place where untrusted catalog JSON is turned into typed values.
//! Any field may be missing, `null`, or of the wrong type at any depth; such
//! records are dropped (and logged at debug), never patched with placeholders.
//!
//! Expected shapes:
//!
//! ```text
//! search:  { "playlists": { "items": [ { "id": "...", ... } | null, ... ] } }
//! listing: { "items": [ { "track": {
//!              "id": "...", "name": "...",
//!              "artists": [ { "name": "..." }, ... ],
//!              "external_urls": { "spotify": "..." },
//!              "album": { "images": [ { "url": "..." }, ... ] } } }, ... ] }
//! ```

use crate::types::Track;
use serde_json::Value;
use tracing::debug;

/// Structurally valid collections of a search response, in upstream order
///
/// A collection is valid when it is a JSON object. Whether it carries a usable
/// id is checked separately by [`collection_id`], so that a first collection
/// without an id is reported as such instead of silently skipped.
pub fn valid_collections(search_response: &Value) -> Vec<&Value> {
    let items = match search_response
        .get("playlists")
        .and_then(|p| p.get("items"))
        .and_then(Value::as_array)
    {
        Some(items) => items,
        None => {
            debug!("Search response has no playlists.items array");
            return Vec::new();
        }
    };

    let valid: Vec<&Value> = items.iter().filter(|item| item.is_object()).collect();
    if valid.len() < items.len() {
        debug!(
            dropped = items.len() - valid.len(),
            kept = valid.len(),
            "Dropped malformed collection entries"
        );
    }
    valid
}

/// Non-blank id of a collection
pub fn collection_id(collection: &Value) -> Option<&str> {
    non_blank_str(collection.get("id"))
}

/// Playable tracks of a listing response, in upstream order
pub fn sanitize_tracks(listing_response: &Value) -> Vec<Track> {
    let items = match listing_response.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None => {
            debug!("Listing response has no items array");
            return Vec::new();
        }
    };

    let tracks: Vec<Track> = items.iter().filter_map(sanitize_item).collect();
    if tracks.len() < items.len() {
        debug!(
            dropped = items.len() - tracks.len(),
            kept = tracks.len(),
            "Dropped unplayable catalog items"
        );
    }
    tracks
}

fn sanitize_item(item: &Value) -> Option<Track> {
    let track = item.get("track").filter(|t| t.is_object())?;

    let name = non_blank_str(track.get("name"))?;
    let artist = non_blank_str(
        track
            .get("artists")
            .and_then(Value::as_array)
            .and_then(|artists| artists.first())
            .and_then(|first| first.get("name")),
    )?;
    let url = non_blank_str(track.get("external_urls").and_then(|u| u.get("spotify")))?;

    let image = non_blank_str(
        track
            .get("album")
            .and_then(|album| album.get("images"))
            .and_then(Value::as_array)
            .and_then(|images| images.first())
            .and_then(|image| image.get("url")),
    );
    let id = non_blank_str(track.get("id"));

    Track::new(name, artist, url).map(|t| {
        t.with_image(image.map(str::to_string))
            .with_id(id.map(str::to_string))
    })
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
