//! Catalog response fixtures in the shape the Spotify Web API returns

use serde_json::{json, Value};

/// Search body listing playlists with the given ids
pub fn playlist_search(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("Playlist {}", id)}))
        .collect();
    json!({"playlists": {"items": items, "total": ids.len()}})
}

/// One fully populated listing item
pub fn track_item(name: &str, artist: &str) -> Value {
    json!({
        "added_at": "2024-01-01T00:00:00Z",
        "track": {
            "id": format!("{}-id", name.to_lowercase().replace(' ', "-")),
            "name": name,
            "artists": [{"name": artist}],
            "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", name.replace(' ', ""))},
            "album": {"images": [{"url": format!("https://i.scdn.co/image/{}", name.replace(' ', ""))}]}
        }
    })
}

/// Listing body with one item per `(name, artist)`
pub fn track_listing(tracks: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = tracks
        .iter()
        .map(|(name, artist)| track_item(name, artist))
        .collect();
    json!({"items": items})
}
