//! In-memory play queue.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::PlaybackSource;
use super::state::{PlaybackError, PlaybackState, QueueTrack, TrackField};
use crate::error::{Error, Result, ResultExt};

/// On-disk queue description.
///
/// ```toml
/// [[tracks]]
/// title = "1969"
/// artist = "Boards of Canada"
/// album = "Geogaddi"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueFile {
    pub tracks: Vec<QueueTrack>,
}

impl QueueFile {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::InvalidFormat(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(format!("reading queue file {}", path.display()))?;
        Self::parse(&contents).with_context(format!("parsing queue file {}", path.display()))
    }
}

#[derive(Debug)]
struct QueueInner {
    tracks: Vec<QueueTrack>,
    position: usize,
    state: PlaybackState,
    closed: bool,
}

/// Play queue held in memory, shared between a driver and the display actor.
#[derive(Debug)]
pub struct LocalQueue {
    inner: RwLock<QueueInner>,
}

impl LocalQueue {
    /// Queue positioned at the first track, stopped.
    pub fn new(tracks: Vec<QueueTrack>) -> Self {
        Self {
            inner: RwLock::new(QueueInner {
                tracks,
                position: 0,
                state: PlaybackState::Stopped,
                closed: false,
            }),
        }
    }

    pub fn from_file(file: QueueFile) -> Self {
        Self::new(file.tracks)
    }

    pub fn len(&self) -> usize {
        self.inner.read().tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().tracks.is_empty()
    }

    pub fn current(&self) -> Option<QueueTrack> {
        let inner = self.inner.read();
        inner.tracks.get(inner.position).cloned()
    }

    pub fn set_state(&self, state: PlaybackState) {
        self.inner.write().state = state;
    }

    /// Jump to `position`. Returns false (and changes nothing) if out of range.
    pub fn set_position(&self, position: usize) -> bool {
        let mut inner = self.inner.write();
        if position >= inner.tracks.len() {
            return false;
        }
        inner.position = position;
        true
    }

    /// Move to the next track. At the end of the queue playback stops.
    pub fn advance(&self) -> bool {
        let mut inner = self.inner.write();
        if inner.position + 1 < inner.tracks.len() {
            inner.position += 1;
            true
        } else {
            inner.state = PlaybackState::Stopped;
            false
        }
    }

    /// End the session. Playback stops and queue queries fail from now on.
    pub fn close(&self) {
        let mut inner = self.inner.write();
        inner.state = PlaybackState::Stopped;
        inner.closed = true;
    }

    /// Replace the current track's metadata (e.g. a stream changing title).
    pub fn update_current(&self, track: QueueTrack) {
        let mut inner = self.inner.write();
        let position = inner.position;
        if let Some(slot) = inner.tracks.get_mut(position) {
            *slot = track;
        }
    }
}

#[async_trait]
impl PlaybackSource for LocalQueue {
    fn track_string(&self, field: TrackField) -> String {
        self.current()
            .map(|t| t.string_field(field))
            .unwrap_or_default()
    }

    fn track_id(&self, field: TrackField) -> i64 {
        self.current().map(|t| t.id_field(field)).unwrap_or(-1)
    }

    fn playback_state(&self) -> PlaybackState {
        self.inner.read().state
    }

    fn queue_position(&self) -> usize {
        self.inner.read().position
    }

    async fn query_queue_tracks(
        &self,
        offset: usize,
        limit: usize,
    ) -> std::result::Result<Vec<QueueTrack>, PlaybackError> {
        let inner = self.inner.read();
        if inner.closed {
            return Err(PlaybackError::Disconnected);
        }
        let tracks = inner.tracks.iter().skip(offset).take(limit);
        Ok(tracks.cloned().collect())
    }
}
