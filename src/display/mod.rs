//! Now-playing artwork display.
//!
//! [`DisplayController`] decides what the now-playing area shows
//! (`Stopped`, `NoArtwork`, `Artwork`) from a stream of metadata events and
//! out-of-order async completions. [`Prefetcher`] warms the image cache for the
//! next queued track. [`runtime`] wires both to real collaborators on a single
//! tokio task and publishes [`DisplaySnapshot`]s.

mod controller;
mod prefetch;
pub mod runtime;
mod state;

pub use controller::DisplayController;
pub use prefetch::Prefetcher;
pub use runtime::DisplayHandle;
pub use state::{
    Command, Completion, DisplaySnapshot, DisplayState, MetadataUpdate, NowPlaying, PrefetchOutcome,
};
