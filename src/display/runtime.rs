//! Single-owner actor driving a [`DisplayController`](super::DisplayController).
//!
//! The actor owns the controller outright and processes one message at a
//! time. Lookups, image loads and prefetches run on spawned tasks and post
//! their results back into the same channel, so every state change happens on
//! the actor task.

mod handle;
mod messages;
mod runner;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub use handle::DisplayHandle;
pub use messages::DisplayMessage;
pub use runner::DisplayActor;

use super::DisplaySnapshot;
use crate::artwork::{ArtworkResolver, ImagePipeline};
use crate::config::SharedSettings;
use crate::playback::PlaybackSource;

/// Start a display actor on the current tokio runtime.
pub fn spawn(
    playback: Arc<dyn PlaybackSource>,
    settings: SharedSettings,
    resolver: Arc<dyn ArtworkResolver>,
    pipeline: Arc<dyn ImagePipeline>,
) -> (DisplayHandle, JoinHandle<()>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(DisplaySnapshot::default());

    let actor = DisplayActor::new(
        playback,
        settings,
        resolver,
        pipeline,
        receiver,
        sender.downgrade(),
        snapshot_tx,
    );
    let task = tokio::spawn(actor.run());

    (DisplayHandle::new(sender, snapshot_rx), task)
}
