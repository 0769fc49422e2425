use tokio::sync::{mpsc, oneshot, watch};

use super::messages::DisplayMessage;
use crate::display::DisplaySnapshot;

/// Public interface of the display actor.
///
/// Every call except [`flush`](Self::flush) is fire-and-forget; results show
/// up in the published [`DisplaySnapshot`].
#[derive(Clone)]
pub struct DisplayHandle {
    sender: mpsc::UnboundedSender<DisplayMessage>,
    snapshot: watch::Receiver<DisplaySnapshot>,
}

impl DisplayHandle {
    pub fn new(
        sender: mpsc::UnboundedSender<DisplayMessage>,
        snapshot: watch::Receiver<DisplaySnapshot>,
    ) -> Self {
        Self { sender, snapshot }
    }

    /// Tell the actor that track metadata, playback state or settings changed
    pub fn metadata_changed(&self) {
        self.send(DisplayMessage::MetadataChanged);
    }

    pub fn suspend(&self) {
        self.send(DisplayMessage::Suspend);
    }

    pub fn resume(&self) {
        self.send(DisplayMessage::Resume);
    }

    pub fn clear(&self) {
        self.send(DisplayMessage::Clear);
    }

    /// Render dimensions used when pre-warming the next track's artwork
    pub fn set_render_size(&self, width: u32, height: u32) {
        self.send(DisplayMessage::SetRenderSize { width, height });
    }

    /// Wait until every message sent before this call has been handled and
    /// its snapshot published. Returns immediately if the actor is gone.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        self.send(DisplayMessage::Flush { reply });
        let _ = done.await;
    }

    pub fn shutdown(&self) {
        self.send(DisplayMessage::Shutdown);
    }

    /// Latest published state
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.snapshot.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    fn send(&self, message: DisplayMessage) {
        if let Err(e) = self.sender.send(message) {
            tracing::debug!("Display actor is gone, dropping {:?}", e.0);
        }
    }
}
