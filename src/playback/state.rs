//! Playback state and track metadata types.

use serde::{Deserialize, Serialize};

/// Current playback status of the remote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Buffering,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_stopped(self) -> bool {
        self == PlaybackState::Stopped
    }
}

/// Fields of the current track exposed by the playback source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackField {
    Artist,
    Album,
    Title,
    ArtistId,
    AlbumId,
}

/// One track record from the play queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// -1 when unknown
    pub artist_id: i64,
    /// -1 when unknown
    pub album_id: i64,
}

impl Default for QueueTrack {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl QueueTrack {
    pub fn new(title: &str, artist: &str, album: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            artist_id: -1,
            album_id: -1,
        }
    }

    pub fn string_field(&self, field: TrackField) -> String {
        match field {
            TrackField::Artist => self.artist.clone(),
            TrackField::Album => self.album.clone(),
            TrackField::Title => self.title.clone(),
            TrackField::ArtistId => self.artist_id.to_string(),
            TrackField::AlbumId => self.album_id.to_string(),
        }
    }

    pub fn id_field(&self, field: TrackField) -> i64 {
        match field {
            TrackField::ArtistId => self.artist_id,
            TrackField::AlbumId => self.album_id,
            _ => -1,
        }
    }
}

/// Errors from the playback source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaybackError {
    #[error("Playback source disconnected")]
    Disconnected,
}
