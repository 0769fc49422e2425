//! Artwork resolver - turns an artist/album key into an image URL.
//!
//! Resolution never blocks the caller and never cancels: the caller spawns
//! the future and decides on completion whether the result still matters.
//! The resolver keeps no image cache; it only remembers URLs it has already
//! looked up, so the same key issued twice costs one network call.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::lastfm::LastFmClient;

use super::cache::BoundedCache;
use super::{ArtworkError, ArtworkKey, ArtworkRequest, ArtworkSize};

/// Number of resolved URLs remembered by [`LastFmResolver`].
const URL_CACHE_CAPACITY: usize = 500;

/// Looks up the artwork URL for a request.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait ArtworkResolver: Send + Sync {
    /// Resolve the image URL for `request`'s key.
    ///
    /// Callers only pass resolvable keys. Failures come back as
    /// [`ArtworkError`], never as a panic.
    async fn resolve(
        &self,
        request: &ArtworkRequest,
        size: ArtworkSize,
    ) -> Result<String, ArtworkError>;
}

/// Resolver backed by Last.fm `album.getinfo`.
pub struct LastFmResolver {
    client: LastFmClient,
    urls: Mutex<BoundedCache<(ArtworkKey, ArtworkSize), String>>,
}

impl LastFmResolver {
    pub fn new(client: LastFmClient) -> Self {
        Self {
            client,
            urls: Mutex::new(BoundedCache::new(URL_CACHE_CAPACITY)),
        }
    }

    /// Number of URLs currently remembered.
    #[cfg(test)]
    pub fn cached_urls(&self) -> usize {
        self.urls.lock().len()
    }
}

#[async_trait]
impl ArtworkResolver for LastFmResolver {
    async fn resolve(
        &self,
        request: &ArtworkRequest,
        size: ArtworkSize,
    ) -> Result<String, ArtworkError> {
        let key = request.key();
        if !key.is_resolvable() {
            return Err(ArtworkError::NotFound);
        }

        let cache_key = (key.clone(), size);
        let cached = self.urls.lock().get(&cache_key);
        if let Some(url) = cached {
            tracing::debug!("Artwork URL cache hit for {}", key);
            return Ok(url);
        }

        let url = self
            .client
            .album_image_url(&key.artist, &key.album, size)
            .await?;

        self.urls.lock().put(cache_key, url.clone());
        Ok(url)
    }
}
