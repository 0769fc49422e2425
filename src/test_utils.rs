//! Test utilities and fixtures for artwatch tests.
//!
//! Provides scripted stand-ins for the artwork resolver and image pipeline,
//! plus common queue and settings fixtures.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{MockPipeline, MockResolver};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let resolver = MockResolver::new().with_url("Autechre", "Amber", "http://x/amber.jpg");
//!     let gate = resolver.gate("Autechre", "Amber");
//!     // ... lookups for Amber now wait until gate.notify_one()
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::artwork::{
    ArtworkError, ArtworkKey, ArtworkRequest, ArtworkResolver, ArtworkSize, ImagePipeline,
    LoadedImage,
};
use crate::config::{Config, SharedSettings};
use crate::playback::QueueTrack;

/// Resolver answering from a fixed table. Unknown keys resolve to `NotFound`.
#[derive(Default)]
pub struct MockResolver {
    results: Mutex<HashMap<ArtworkKey, Result<String, ArtworkError>>>,
    gates: Mutex<HashMap<ArtworkKey, Arc<Notify>>>,
    calls: Mutex<Vec<(ArtworkRequest, ArtworkSize)>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(self, artist: &str, album: &str, url: &str) -> Self {
        self.with_result(artist, album, Ok(url.to_string()))
    }

    pub fn with_result(
        self,
        artist: &str,
        album: &str,
        result: Result<String, ArtworkError>,
    ) -> Self {
        self.set_result(artist, album, result);
        self
    }

    /// Change the answer for a key after construction.
    pub fn set_result(&self, artist: &str, album: &str, result: Result<String, ArtworkError>) {
        self.results
            .lock()
            .insert(ArtworkKey::new(artist, album), result);
    }

    /// Hold lookups for this key until the returned `Notify` is signalled once per lookup.
    pub fn gate(&self, artist: &str, album: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(ArtworkKey::new(artist, album))
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn calls(&self) -> Vec<(ArtworkRequest, ArtworkSize)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of lookups issued for one key.
    pub fn calls_for(&self, artist: &str, album: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(request, _)| request.matches(artist, album))
            .count()
    }
}

#[async_trait]
impl ArtworkResolver for MockResolver {
    async fn resolve(
        &self,
        request: &ArtworkRequest,
        size: ArtworkSize,
    ) -> Result<String, ArtworkError> {
        self.calls.lock().push((request.clone(), size));

        let gate = self.gates.lock().get(request.key()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let result = self.results.lock().get(request.key()).cloned();
        result.unwrap_or(Err(ArtworkError::NotFound))
    }
}

/// Image pipeline that never touches the network.
#[derive(Default)]
pub struct MockPipeline {
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    loads: Mutex<Vec<String>>,
    preloads: Mutex<Vec<(String, u32, u32)>>,
}

impl MockPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load and preload of `url` fail with a network error.
    pub fn fail(&self, url: &str) {
        self.failing.lock().insert(url.to_string());
    }

    /// Hold loads of `url` until the returned `Notify` is signalled.
    pub fn gate(&self, url: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().clone()
    }

    pub fn preloads(&self) -> Vec<(String, u32, u32)> {
        self.preloads.lock().clone()
    }

    fn check(&self, url: &str) -> Result<(), ArtworkError> {
        if self.failing.lock().contains(url) {
            return Err(ArtworkError::Network(format!("mock failure for {}", url)));
        }
        Ok(())
    }
}

#[async_trait]
impl ImagePipeline for MockPipeline {
    async fn load(&self, url: &str) -> Result<LoadedImage, ArtworkError> {
        self.loads.lock().push(url.to_string());

        let gate = self.gates.lock().get(url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.check(url)?;
        Ok(mock_image(url))
    }

    async fn preload(&self, url: &str, width: u32, height: u32) -> Result<(), ArtworkError> {
        self.preloads.lock().push((url.to_string(), width, height));
        self.check(url)
    }
}

/// Decoded image stand-in for `url`.
pub fn mock_image(url: &str) -> LoadedImage {
    LoadedImage {
        url: url.to_string(),
        width: 300,
        height: 300,
        data: vec![0u8; 16],
    }
}

/// Three tracks: two from Geogaddi, then one from a different album.
pub fn mock_queue_tracks() -> Vec<QueueTrack> {
    vec![
        QueueTrack::new("1969", "Boards of Canada", "Geogaddi"),
        QueueTrack::new("Dandelion", "Boards of Canada", "Geogaddi"),
        QueueTrack::new(
            "Roygbiv",
            "Boards of Canada",
            "Music Has the Right to Children",
        ),
    ]
}

/// Settings with the artwork feature switched on or off.
pub fn settings_with_artwork(enabled: bool) -> SharedSettings {
    let mut config = Config::default();
    config.artwork.enabled = enabled;
    SharedSettings::new(config)
}
