//! Display state, events and commands.

use std::sync::Arc;

use crate::artwork::{ArtworkKey, ArtworkRequest, ArtworkSize, LoadedImage, RequestId};
use crate::playback::PlaybackState;

/// What the now-playing area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// Nothing is playing; no artwork, no metadata block
    #[default]
    Stopped,
    /// Metadata without artwork
    NoArtwork,
    /// Metadata with the current track's artwork
    Artwork,
}

/// Input of the display state machine, read fresh for every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub artist: String,
    pub album: String,
    pub title: String,
    pub playback_stopped: bool,
    pub artwork_enabled: bool,
}

impl MetadataUpdate {
    /// Update for a playing track with artwork enabled.
    pub fn playing(artist: &str, album: &str, title: &str) -> Self {
        Self {
            artist: artist.to_string(),
            album: album.to_string(),
            title: title.to_string(),
            playback_stopped: false,
            artwork_enabled: true,
        }
    }

    pub fn stopped(self) -> Self {
        Self {
            playback_stopped: true,
            ..self
        }
    }

    pub fn artwork_disabled(self) -> Self {
        Self {
            artwork_enabled: false,
            ..self
        }
    }
}

/// Asynchronous work requested by the controller.
///
/// The owner loop runs each command on a background task and feeds the
/// completion back to the controller together with the originating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up the artwork URL for a request
    Resolve {
        request: ArtworkRequest,
        size: ArtworkSize,
    },
    /// Download and decode a resolved URL for display
    LoadImage {
        request: ArtworkRequest,
        url: String,
    },
    /// Warm the image cache for the track after the current one
    Prefetch {
        current: ArtworkKey,
        size: ArtworkSize,
        width: u32,
        height: u32,
    },
}

/// Result of a prefetch attempt. Only ever logged or inspected by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefetchOutcome {
    /// Next track's artwork is now in the image cache
    Warmed(String),
    /// Current track is the last one in the queue
    NoNextTrack,
    /// Next track shares the displayed artwork
    SameArtwork,
    /// Next track has no artist or album
    Unresolvable,
    Failed(String),
}

/// Text fields of the current track, passed through for the host UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artist_id: i64,
    pub album_id: i64,
    pub playback: PlaybackState,
}

/// Everything a renderer needs, published after every processed message.
#[derive(Debug, Clone, Default)]
pub struct DisplaySnapshot {
    pub state: DisplayState,
    pub artwork_url: Option<String>,
    pub image: Option<Arc<LoadedImage>>,
    pub request_id: RequestId,
    pub now_playing: NowPlaying,
    pub suspended: bool,
    pub last_prefetch: Option<PrefetchOutcome>,
    /// Lookup and image completions handled so far, stale ones included
    pub completions: u64,
    /// Completions dropped because their request had been superseded
    pub stale_completions: u64,
}

/// Result of feeding an async completion to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The completion belonged to the held request and was applied
    Applied(Option<Command>),
    /// The completion's request was superseded; nothing changed
    Stale,
}

impl Completion {
    pub fn is_stale(&self) -> bool {
        matches!(self, Completion::Stale)
    }

    pub fn into_command(self) -> Option<Command> {
        match self {
            Completion::Applied(command) => command,
            Completion::Stale => None,
        }
    }
}
