use tokio::sync::oneshot;

use crate::artwork::{ArtworkError, ArtworkRequest, LoadedImage};
use crate::display::PrefetchOutcome;

/// Messages processed by the display actor
#[derive(Debug)]
pub enum DisplayMessage {
    /// Track metadata or playback state changed; the actor re-reads the source
    MetadataChanged,

    /// Host view went away
    Suspend,

    /// Host view came back
    Resume,

    Clear,

    SetRenderSize { width: u32, height: u32 },

    /// URL lookup finished (sent by a spawned task)
    ArtworkResolved {
        request: ArtworkRequest,
        result: Result<String, ArtworkError>,
    },

    /// Image download and decode finished (sent by a spawned task)
    ImageLoaded {
        request: ArtworkRequest,
        result: Result<LoadedImage, ArtworkError>,
    },

    PrefetchFinished(PrefetchOutcome),

    /// Reply once every earlier message has been handled and published
    Flush { reply: oneshot::Sender<()> },

    Shutdown,
}
