//! Last.fm API Data Transfer Objects
//!
//! Only the parts of `album.getinfo` needed to pick a cover image.
//!
//! API Reference: https://www.last.fm/api/show/album.getInfo

use serde::{Deserialize, Serialize};

/// Response body of `album.getinfo`.
///
/// Last.fm reports failures in-band with `error`/`message`, sometimes with a
/// 200 status, so both shapes share one struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumInfoResponse {
    pub album: Option<Album>,
    /// Last.fm error code (6 = not found, 29 = rate limit exceeded)
    pub error: Option<i64>,
    pub message: Option<String>,
}

/// Album info
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub name: String,
    pub artist: String,
    /// MusicBrainz release ID, often empty
    #[serde(default)]
    pub mbid: Option<String>,
    #[serde(default)]
    pub image: Vec<Image>,
}

/// One entry of the image array
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    /// Image URL, empty when Last.fm has no image of this size
    #[serde(rename = "#text")]
    pub url: String,
    /// small, medium, large, extralarge, mega, or ""
    pub size: String,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_album_info() {
        let json = r##"{
            "album": {
                "name": "Geogaddi",
                "artist": "Boards of Canada",
                "mbid": "0b7ab8d7-6ab5-4a3c-9c6b-a8d5e3e1ee5a",
                "url": "https://www.last.fm/music/Boards+of+Canada/Geogaddi",
                "image": [
                    {"#text": "https://lastfm.example/i/u/34s/geo.png", "size": "small"},
                    {"#text": "https://lastfm.example/i/u/64s/geo.png", "size": "medium"},
                    {"#text": "https://lastfm.example/i/u/174s/geo.png", "size": "large"},
                    {"#text": "https://lastfm.example/i/u/300x300/geo.png", "size": "extralarge"},
                    {"#text": "https://lastfm.example/i/u/300x300/geo.png", "size": "mega"},
                    {"#text": "https://lastfm.example/i/u/300x300/geo.png", "size": ""}
                ],
                "listeners": "512345"
            }
        }"##;

        let response: AlbumInfoResponse =
            serde_json::from_str(json).expect("Should parse album info");

        let album = response.album.expect("album present");
        assert_eq!(album.name, "Geogaddi");
        assert_eq!(album.image.len(), 6);
        assert_eq!(album.image[4].size, "mega");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_parse_error_payload() {
        let json = r#"{"error": 6, "message": "Album not found", "links": []}"#;

        let response: AlbumInfoResponse =
            serde_json::from_str(json).expect("Should parse error payload");

        assert!(response.album.is_none());
        assert_eq!(response.error, Some(6));
        assert_eq!(response.message.as_deref(), Some("Album not found"));
    }

    #[test]
    fn test_parse_album_without_images() {
        let json = r#"{"album": {"name": "Untitled", "artist": "Someone"}}"#;

        let response: AlbumInfoResponse =
            serde_json::from_str(json).expect("Should parse album without images");

        assert!(response.album.unwrap().image.is_empty());
    }
}
