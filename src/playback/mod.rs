//! Playback source - where "now playing" metadata comes from.
//!
//! The display side never talks to a transport directly. It reads the current
//! track through [`PlaybackSource`], which a remote-control client, a local
//! player or a test double can implement. [`LocalQueue`] is the in-memory
//! implementation used by the CLI.

mod queue;
mod state;

use async_trait::async_trait;

pub use queue::{LocalQueue, QueueFile};
pub use state::{PlaybackError, PlaybackState, QueueTrack, TrackField};

/// Read access to the playback session.
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    /// String field of the current track, empty when unknown.
    fn track_string(&self, field: TrackField) -> String;

    /// Numeric field of the current track, -1 when unknown.
    fn track_id(&self, field: TrackField) -> i64;

    fn playback_state(&self) -> PlaybackState;

    /// Index of the current track in the play queue.
    fn queue_position(&self) -> usize;

    /// Up to `limit` queue entries starting at absolute index `offset`.
    async fn query_queue_tracks(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<QueueTrack>, PlaybackError>;
}
