//! Cache warming for the next queued track.

use std::sync::Arc;

use super::state::PrefetchOutcome;
use crate::artwork::{ArtworkKey, ArtworkRequest, ArtworkResolver, ArtworkSize, ImagePipeline};
use crate::playback::{PlaybackSource, TrackField};

/// Resolves and preloads the artwork of the track after the current one.
///
/// Never touches display state. Every failure is swallowed and only reported
/// through the returned [`PrefetchOutcome`].
#[derive(Clone)]
pub struct Prefetcher {
    playback: Arc<dyn PlaybackSource>,
    resolver: Arc<dyn ArtworkResolver>,
    pipeline: Arc<dyn ImagePipeline>,
}

impl Prefetcher {
    pub fn new(
        playback: Arc<dyn PlaybackSource>,
        resolver: Arc<dyn ArtworkResolver>,
        pipeline: Arc<dyn ImagePipeline>,
    ) -> Self {
        Self {
            playback,
            resolver,
            pipeline,
        }
    }

    /// Warm the cache for the track after the one playing now.
    ///
    /// `current` is the key that was on screen when the prefetch was
    /// requested. The track may have changed since, so the next track is
    /// compared with the key playing at the time the queue is read and
    /// `current` only stands in when that key is unusable.
    pub async fn prefetch_next(
        &self,
        current: &ArtworkKey,
        size: ArtworkSize,
        width: u32,
        height: u32,
    ) -> PrefetchOutcome {
        let playing = self.playing_key().unwrap_or_else(|| current.clone());
        let offset = self.playback.queue_position() + 1;

        let next = match self.playback.query_queue_tracks(offset, 1).await {
            Ok(tracks) => tracks.into_iter().next(),
            Err(e) => {
                tracing::debug!("Prefetch queue query failed: {}", e);
                return PrefetchOutcome::Failed(e.to_string());
            }
        };
        let Some(next) = next else {
            return PrefetchOutcome::NoNextTrack;
        };

        let key = ArtworkKey::new(next.artist, next.album);
        if !key.is_resolvable() {
            return PrefetchOutcome::Unresolvable;
        }
        if key == playing {
            return PrefetchOutcome::SameArtwork;
        }

        let request = ArtworkRequest::new(key, next.title);
        let url = match self.resolver.resolve(&request, size).await {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => return PrefetchOutcome::Failed("empty artwork URL".to_string()),
            Err(e) => {
                tracing::debug!("Prefetch lookup for {} failed: {}", request.key(), e);
                return PrefetchOutcome::Failed(e.to_string());
            }
        };

        if let Err(e) = self.pipeline.preload(&url, width, height).await {
            tracing::debug!("Prefetch preload of {} failed: {}", url, e);
            return PrefetchOutcome::Failed(e.to_string());
        }

        tracing::debug!("Prefetched artwork for {}", request.key());
        PrefetchOutcome::Warmed(url)
    }

    fn playing_key(&self) -> Option<ArtworkKey> {
        let key = ArtworkKey::new(
            self.playback.track_string(TrackField::Artist),
            self.playback.track_string(TrackField::Album),
        );
        key.is_resolvable().then_some(key)
    }
}
