//! Last.fm HTTP client
//!
//! Looks up album artwork URLs by artist and album name.
//! Requires an API key (https://www.last.fm/api/account/create).
//!
//! API: https://ws.audioscrobbler.com/2.0

use super::dto;
use crate::artwork::{ArtworkError, ArtworkSize};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0";

/// User agent string sent with every request
const USER_AGENT: &str = concat!("artwatch/", env!("CARGO_PKG_VERSION"));

/// Last.fm error codes we treat specially
const ERROR_NOT_FOUND: i64 = 6;
const ERROR_RATE_LIMITED: i64 = 29;

/// Last.fm API client
pub struct LastFmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LastFmClient {
    /// Create a client against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (proxies, tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with user agent: {}", e);
                reqwest::Client::new()
            });

        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch `album.getinfo` for an artist/album pair
    pub async fn album_info(&self, artist: &str, album: &str) -> Result<dto::Album, ArtworkError> {
        let url = format!(
            "{}/?method=album.getinfo&api_key={}&artist={}&album={}&autocorrect=0&format=json",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(artist),
            urlencoding::encode(album),
        );

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ArtworkError::RateLimited);
        }

        // Error payloads come with 4xx statuses too, so parse before judging the status
        let body = response
            .text()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?;

        match serde_json::from_str::<dto::AlbumInfoResponse>(&body) {
            Ok(parsed) => into_album(parsed),
            Err(_) if status == reqwest::StatusCode::NOT_FOUND => Err(ArtworkError::NotFound),
            Err(_) if !status.is_success() => Err(ArtworkError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            ))),
            Err(e) => Err(ArtworkError::Parse(e.to_string())),
        }
    }

    /// Resolve the cover image URL for an album at the requested size
    pub async fn album_image_url(
        &self,
        artist: &str,
        album: &str,
        size: ArtworkSize,
    ) -> Result<String, ArtworkError> {
        let info = self.album_info(artist, album).await?;
        pick_image(&info.image, size).ok_or(ArtworkError::NotFound)
    }
}

/// Map an in-band error payload to [`ArtworkError`]
fn into_album(response: dto::AlbumInfoResponse) -> Result<dto::Album, ArtworkError> {
    match (response.album, response.error) {
        (_, Some(ERROR_NOT_FOUND)) => Err(ArtworkError::NotFound),
        (_, Some(ERROR_RATE_LIMITED)) => Err(ArtworkError::RateLimited),
        (_, Some(code)) => Err(ArtworkError::Api {
            code,
            message: response.message.unwrap_or_default(),
        }),
        (Some(album), None) => Ok(album),
        (None, None) => Err(ArtworkError::Parse(
            "response has neither album nor error".to_string(),
        )),
    }
}

/// Choose the image URL for `size`.
///
/// Exact size first, then the largest image not bigger than requested, then
/// the largest image available at all.
pub fn pick_image(images: &[dto::Image], size: ArtworkSize) -> Option<String> {
    let mut sized: Vec<(ArtworkSize, &str)> = images
        .iter()
        .filter(|img| !img.url.is_empty())
        .filter_map(|img| {
            let size = ArtworkSize::from_label(&img.size)?;
            Some((size, img.url.as_str()))
        })
        .collect();

    if let Some((_, url)) = sized.iter().find(|(s, _)| *s == size) {
        return Some(url.to_string());
    }

    sized.sort_by_key(|(s, _)| *s as u8);

    sized
        .iter()
        .rev()
        .find(|(s, _)| (*s as u8) <= (size as u8))
        .or_else(|| sized.last())
        .map(|(_, url)| url.to_string())
}
