//! Image pipeline - downloads and decodes artwork.
//!
//! The display controller only needs two things from an image pipeline:
//! load an image for display, and warm the cache for an image that will
//! probably be displayed next. [`HttpImagePipeline`] is the in-process
//! implementation used by the CLI; a GUI would plug in its own.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::cache::BoundedCache;
use super::{ArtworkError, LoadedImage};

/// Number of downloaded images kept in memory.
const IMAGE_CACHE_CAPACITY: usize = 32;

/// Loads artwork images.
#[async_trait]
pub trait ImagePipeline: Send + Sync {
    /// Fetch and decode an image for display.
    async fn load(&self, url: &str) -> Result<LoadedImage, ArtworkError>;

    /// Fetch an image into the cache for the given render size, discarding
    /// the decoded result.
    async fn preload(&self, url: &str, width: u32, height: u32) -> Result<(), ArtworkError>;
}

/// HTTP download + `image` decode, with a small in-memory byte cache.
pub struct HttpImagePipeline {
    http_client: reqwest::Client,
    cache: Mutex<BoundedCache<String, Arc<Vec<u8>>>>,
}

impl HttpImagePipeline {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            cache: Mutex::new(BoundedCache::new(IMAGE_CACHE_CAPACITY)),
        }
    }

    /// Whether `url` is already in the byte cache.
    #[cfg(test)]
    pub fn is_cached(&self, url: &str) -> bool {
        self.cache.lock().contains(&url.to_string())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Arc<Vec<u8>>, ArtworkError> {
        let cached = self.cache.lock().get(&url.to_string());
        if let Some(bytes) = cached {
            return Ok(bytes);
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ArtworkError::NotFound);
        }

        if !status.is_success() {
            return Err(ArtworkError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let bytes = Arc::new(
            response
                .bytes()
                .await
                .map_err(|e| ArtworkError::Network(e.to_string()))?
                .to_vec(),
        );

        self.cache.lock().put(url.to_string(), bytes.clone());
        Ok(bytes)
    }
}

impl Default for HttpImagePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImagePipeline for HttpImagePipeline {
    async fn load(&self, url: &str) -> Result<LoadedImage, ArtworkError> {
        let bytes = self.fetch_bytes(url).await?;
        let decoded = bytes.clone();

        // Decoding is CPU work; keep it off the async workers
        let (width, height) = tokio::task::spawn_blocking(move || decode_dimensions(&decoded))
            .await
            .map_err(|e| ArtworkError::Decode(e.to_string()))??;

        Ok(LoadedImage {
            url: url.to_string(),
            width,
            height,
            data: bytes.to_vec(),
        })
    }

    async fn preload(&self, url: &str, width: u32, height: u32) -> Result<(), ArtworkError> {
        let bytes = self.fetch_bytes(url).await?;
        tracing::debug!(
            "Preloaded {} ({} bytes) for {}x{}",
            url,
            bytes.len(),
            width,
            height
        );
        Ok(())
    }
}

/// Decode an encoded image far enough to validate it and read its size.
pub fn decode_dimensions(data: &[u8]) -> Result<(u32, u32), ArtworkError> {
    let image = image::load_from_memory(data).map_err(|e| ArtworkError::Decode(e.to_string()))?;
    Ok((image.width(), image.height()))
}
