use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::messages::DisplayMessage;
use crate::artwork::{ArtworkResolver, ImagePipeline};
use crate::config::SharedSettings;
use crate::display::{
    Command, Completion, DisplayController, DisplaySnapshot, MetadataUpdate, NowPlaying,
    PrefetchOutcome, Prefetcher,
};
use crate::playback::{PlaybackSource, TrackField};

/// Display actor main loop
pub struct DisplayActor {
    controller: DisplayController,
    playback: Arc<dyn PlaybackSource>,
    settings: SharedSettings,
    resolver: Arc<dyn ArtworkResolver>,
    pipeline: Arc<dyn ImagePipeline>,
    prefetcher: Prefetcher,
    now_playing: NowPlaying,
    last_prefetch: Option<PrefetchOutcome>,
    completions: u64,
    stale_completions: u64,
    receiver: mpsc::UnboundedReceiver<DisplayMessage>,
    /// Weak so that dropping every handle ends the loop
    sender: mpsc::WeakUnboundedSender<DisplayMessage>,
    snapshot: watch::Sender<DisplaySnapshot>,
}

impl DisplayActor {
    pub fn new(
        playback: Arc<dyn PlaybackSource>,
        settings: SharedSettings,
        resolver: Arc<dyn ArtworkResolver>,
        pipeline: Arc<dyn ImagePipeline>,
        receiver: mpsc::UnboundedReceiver<DisplayMessage>,
        sender: mpsc::WeakUnboundedSender<DisplayMessage>,
        snapshot: watch::Sender<DisplaySnapshot>,
    ) -> Self {
        let controller = DisplayController::new(settings.artwork_size(), settings.render_size());
        let prefetcher = Prefetcher::new(playback.clone(), resolver.clone(), pipeline.clone());

        Self {
            controller,
            playback,
            settings,
            resolver,
            pipeline,
            prefetcher,
            now_playing: NowPlaying::default(),
            last_prefetch: None,
            completions: 0,
            stale_completions: 0,
            receiver,
            sender,
            snapshot,
        }
    }

    /// Run the actor main loop
    pub async fn run(mut self) {
        tracing::info!("Display actor started");
        self.publish();

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DisplayMessage::Shutdown => break,
                // Everything before it has already been published
                DisplayMessage::Flush { reply } => {
                    let _ = reply.send(());
                }
                msg => {
                    let command = self.handle_message(msg);
                    self.publish();
                    if let Some(command) = command {
                        self.execute(command);
                    }
                }
            }
        }

        tracing::info!("Display actor stopped");
    }

    fn handle_message(&mut self, msg: DisplayMessage) -> Option<Command> {
        match msg {
            DisplayMessage::MetadataChanged => {
                let update = self.read_update();
                if !self.controller.is_suspended() {
                    self.refresh_now_playing();
                }
                self.controller.on_metadata_or_settings_changed(&update)
            }

            DisplayMessage::Suspend => {
                self.controller.suspend();
                None
            }

            DisplayMessage::Resume => {
                let update = self.read_update();
                self.refresh_now_playing();
                self.controller.resume(&update)
            }

            DisplayMessage::Clear => {
                self.controller.clear();
                None
            }

            DisplayMessage::SetRenderSize { width, height } => {
                self.controller.set_render_size(width, height);
                None
            }

            DisplayMessage::ArtworkResolved { request, result } => {
                let completion = self.controller.on_resolved(&request, result);
                self.record(completion)
            }

            DisplayMessage::ImageLoaded { request, result } => {
                let completion = self.controller.on_image_loaded(&request, result);
                self.record(completion)
            }

            DisplayMessage::PrefetchFinished(outcome) => {
                tracing::debug!("Prefetch finished: {:?}", outcome);
                self.last_prefetch = Some(outcome);
                None
            }

            DisplayMessage::Flush { .. } | DisplayMessage::Shutdown => None,
        }
    }

    fn record(&mut self, completion: Completion) -> Option<Command> {
        self.completions += 1;
        if completion.is_stale() {
            self.stale_completions += 1;
        }
        completion.into_command()
    }

    /// Current conditions, read fresh from the playback source and settings.
    fn read_update(&mut self) -> MetadataUpdate {
        let size = self.settings.artwork_size();
        self.controller.set_artwork_size(size);

        MetadataUpdate {
            artist: self.playback.track_string(TrackField::Artist),
            album: self.playback.track_string(TrackField::Album),
            title: self.playback.track_string(TrackField::Title),
            playback_stopped: self.playback.playback_state().is_stopped(),
            artwork_enabled: self.settings.artwork_enabled(),
        }
    }

    fn refresh_now_playing(&mut self) {
        self.now_playing = NowPlaying {
            title: self.playback.track_string(TrackField::Title),
            artist: self.playback.track_string(TrackField::Artist),
            album: self.playback.track_string(TrackField::Album),
            artist_id: self.playback.track_id(TrackField::ArtistId),
            album_id: self.playback.track_id(TrackField::AlbumId),
            playback: self.playback.playback_state(),
        };
    }

    /// Run a command on a background task; its completion comes back as a message.
    fn execute(&self, command: Command) {
        let Some(sender) = self.sender.upgrade() else {
            tracing::debug!("No display handles left, dropping {:?}", command);
            return;
        };

        match command {
            Command::Resolve { request, size } => {
                let resolver = self.resolver.clone();
                tokio::spawn(async move {
                    let result = resolver.resolve(&request, size).await;
                    let _ = sender.send(DisplayMessage::ArtworkResolved { request, result });
                });
            }

            Command::LoadImage { request, url } => {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    let result = pipeline.load(&url).await;
                    let _ = sender.send(DisplayMessage::ImageLoaded { request, result });
                });
            }

            Command::Prefetch {
                current,
                size,
                width,
                height,
            } => {
                let prefetcher = self.prefetcher.clone();
                tokio::spawn(async move {
                    let outcome = prefetcher.prefetch_next(&current, size, width, height).await;
                    let _ = sender.send(DisplayMessage::PrefetchFinished(outcome));
                });
            }
        }
    }

    fn publish(&self) {
        let controller = &self.controller;
        self.snapshot.send_replace(DisplaySnapshot {
            state: controller.display_state(),
            artwork_url: controller.current_artwork_url().map(str::to_string),
            image: controller.displayed_image(),
            request_id: controller.current_request().id(),
            now_playing: self.now_playing.clone(),
            suspended: controller.is_suspended(),
            last_prefetch: self.last_prefetch.clone(),
            completions: self.completions,
            stale_completions: self.stale_completions,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::artwork::RequestId;
    use crate::display::DisplayState;
    use crate::display::runtime::{DisplayHandle, spawn};
    use crate::playback::{LocalQueue, PlaybackState};
    use crate::test_utils::{
        MockPipeline, MockResolver, mock_queue_tracks, settings_with_artwork,
    };

    const BOC: &str = "Boards of Canada";
    const GEOGADDI_URL: &str = "http://x/geogaddi.jpg";
    const MHTRTC_URL: &str = "http://x/mhtrtc.jpg";

    struct Harness {
        handle: DisplayHandle,
        task: tokio::task::JoinHandle<()>,
        queue: Arc<LocalQueue>,
        settings: SharedSettings,
        resolver: Arc<MockResolver>,
        pipeline: Arc<MockPipeline>,
    }

    fn start(resolver: MockResolver, artwork_enabled: bool) -> Harness {
        let queue = Arc::new(LocalQueue::new(mock_queue_tracks()));
        queue.set_state(PlaybackState::Playing);
        let settings = settings_with_artwork(artwork_enabled);
        let resolver = Arc::new(resolver);
        let pipeline = Arc::new(MockPipeline::new());

        let (handle, task) = spawn(
            queue.clone(),
            settings.clone(),
            resolver.clone(),
            pipeline.clone(),
        );

        Harness {
            handle,
            task,
            queue,
            settings,
            resolver,
            pipeline,
        }
    }

    fn known_albums() -> MockResolver {
        MockResolver::new()
            .with_url(BOC, "Geogaddi", GEOGADDI_URL)
            .with_url(BOC, "Music Has the Right to Children", MHTRTC_URL)
    }

    async fn wait_for(
        handle: &DisplayHandle,
        mut predicate: impl FnMut(&DisplaySnapshot) -> bool,
    ) -> DisplaySnapshot {
        let mut rx = handle.subscribe();
        let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| predicate(s)))
            .await
            .expect("timed out waiting for display snapshot")
            .expect("display actor stopped");
        snapshot.clone()
    }

    #[tokio::test]
    async fn test_displays_artwork_for_current_track() {
        let h = start(known_albums(), true);
        h.handle.metadata_changed();

        let snapshot = wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;
        assert_eq!(snapshot.artwork_url.as_deref(), Some(GEOGADDI_URL));
        let shown = snapshot.image.as_ref().map(|i| i.url.as_str());
        assert_eq!(shown, Some(GEOGADDI_URL));
        assert_eq!(snapshot.now_playing.title, "1969");
        assert_eq!(snapshot.now_playing.album_id, -1);
        assert_eq!(snapshot.now_playing.playback, PlaybackState::Playing);
        assert_eq!(h.resolver.call_count(), 1);
        assert_eq!(h.pipeline.loads(), vec![GEOGADDI_URL.to_string()]);

        // Next track is on the same album
        let snapshot = wait_for(&h.handle, |s| s.last_prefetch.is_some()).await;
        assert_eq!(snapshot.last_prefetch, Some(PrefetchOutcome::SameArtwork));
    }

    #[tokio::test]
    async fn test_prefetches_next_album() {
        let h = start(known_albums(), true);
        h.queue.set_position(1);
        h.handle.set_render_size(200, 100);
        h.handle.metadata_changed();

        let snapshot = wait_for(&h.handle, |s| s.last_prefetch.is_some()).await;
        assert_eq!(
            snapshot.last_prefetch,
            Some(PrefetchOutcome::Warmed(MHTRTC_URL.to_string()))
        );
        assert_eq!(
            h.pipeline.preloads(),
            vec![(MHTRTC_URL.to_string(), 200, 100)]
        );
        assert_eq!(snapshot.artwork_url.as_deref(), Some(GEOGADDI_URL));
    }

    #[tokio::test]
    async fn test_slow_lookup_for_skipped_track_is_ignored() {
        let resolver = known_albums();
        let geogaddi_gate = resolver.gate(BOC, "Geogaddi");
        let mhtrtc_gate = resolver.gate(BOC, "Music Has the Right to Children");
        let h = start(resolver, true);

        h.handle.metadata_changed();
        let first = wait_for(&h.handle, |s| s.request_id != RequestId::NONE).await;

        h.queue.set_position(2);
        h.handle.metadata_changed();
        let second = wait_for(&h.handle, |s| s.request_id != first.request_id).await;
        assert!(second.request_id > first.request_id);
        assert_eq!(second.state, DisplayState::NoArtwork);

        geogaddi_gate.notify_one();
        mhtrtc_gate.notify_one();

        // Both lookups and the MHTRTC image, with the Geogaddi lookup dropped
        let settled = wait_for(&h.handle, |s| {
            s.completions == 3 && s.stale_completions == 1
        })
        .await;
        assert_eq!(settled.state, DisplayState::Artwork);
        assert_eq!(settled.artwork_url.as_deref(), Some(MHTRTC_URL));
        assert_eq!(h.pipeline.loads(), vec![MHTRTC_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_slow_image_for_skipped_track_is_never_shown() {
        let h = start(known_albums(), true);
        let geogaddi_gate = h.pipeline.gate(GEOGADDI_URL);

        h.handle.metadata_changed();
        // Geogaddi URL applied; its image load is now held at the gate
        wait_for(&h.handle, |s| s.completions == 1).await;

        h.queue.set_position(2);
        h.handle.metadata_changed();
        geogaddi_gate.notify_one();

        let shown = wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;
        assert_eq!(shown.artwork_url.as_deref(), Some(MHTRTC_URL));

        let settled = wait_for(&h.handle, |s| {
            s.completions == 4 && s.stale_completions == 1
        })
        .await;
        assert_eq!(settled.state, DisplayState::Artwork);
        assert_eq!(settled.artwork_url.as_deref(), Some(MHTRTC_URL));
        let image = settled.image.as_ref().map(|i| i.url.as_str());
        assert_eq!(image, Some(MHTRTC_URL));

        let loads = h.pipeline.loads();
        assert_eq!(loads.len(), 2);
        assert!(loads.contains(&GEOGADDI_URL.to_string()));
        assert!(loads.contains(&MHTRTC_URL.to_string()));
    }

    #[tokio::test]
    async fn test_repeated_events_issue_one_lookup() {
        let h = start(known_albums(), true);
        h.handle.metadata_changed();
        wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;

        h.queue.set_position(1);
        h.handle.metadata_changed();
        h.handle.metadata_changed();
        let snapshot = wait_for(&h.handle, |s| s.now_playing.title == "Dandelion").await;

        assert_eq!(snapshot.state, DisplayState::Artwork);
        assert_eq!(h.resolver.calls_for(BOC, "Geogaddi"), 1);
        assert_eq!(h.pipeline.loads().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_artwork_never_looks_up() {
        let h = start(known_albums(), false);
        h.handle.metadata_changed();

        let snapshot = wait_for(&h.handle, |s| s.state == DisplayState::NoArtwork).await;
        assert_eq!(snapshot.request_id, RequestId::NONE);
        assert_eq!(h.resolver.call_count(), 0);

        h.settings.set_artwork_enabled(true);
        h.handle.metadata_changed();
        wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;
        assert_eq!(h.resolver.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_and_play_reloads_image() {
        let h = start(known_albums(), true);
        h.handle.metadata_changed();
        wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;

        h.queue.set_state(PlaybackState::Stopped);
        h.handle.metadata_changed();
        let stopped = wait_for(&h.handle, |s| s.state == DisplayState::Stopped).await;
        assert!(stopped.image.is_none());

        h.queue.set_state(PlaybackState::Playing);
        h.handle.metadata_changed();
        wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;

        assert_eq!(h.resolver.call_count(), 1);
        assert_eq!(
            h.pipeline.loads(),
            vec![GEOGADDI_URL.to_string(), GEOGADDI_URL.to_string()]
        );
    }

    #[tokio::test]
    async fn test_image_failure_shows_no_artwork() {
        let h = start(known_albums(), true);
        h.pipeline.fail(GEOGADDI_URL);
        h.handle.metadata_changed();

        // Lookup, then the failed load
        let snapshot = wait_for(&h.handle, |s| s.completions == 2).await;
        assert_eq!(snapshot.state, DisplayState::NoArtwork);
        assert!(snapshot.image.is_none());
        assert_eq!(snapshot.stale_completions, 0);
        assert_eq!(h.pipeline.loads(), vec![GEOGADDI_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_suspend_and_resume() {
        let h = start(known_albums(), true);
        h.handle.metadata_changed();
        let shown = wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;

        h.handle.suspend();
        h.queue.set_position(2);
        h.handle.metadata_changed();
        h.handle.clear();
        h.handle.flush().await;

        let suspended = h.handle.snapshot();
        assert!(suspended.suspended);
        assert_eq!(suspended.request_id, shown.request_id);
        assert_eq!(suspended.now_playing.title, "1969");
        assert_eq!(suspended.state, DisplayState::Artwork);

        h.handle.resume();
        let resumed = wait_for(&h.handle, |s| {
            !s.suspended && s.artwork_url.as_deref() == Some(MHTRTC_URL)
        })
        .await;
        assert_eq!(resumed.now_playing.title, "Roygbiv");
    }

    #[tokio::test]
    async fn test_clear_drops_artwork() {
        let h = start(known_albums(), true);
        h.handle.metadata_changed();
        wait_for(&h.handle, |s| s.state == DisplayState::Artwork).await;

        h.handle.clear();
        let cleared = wait_for(&h.handle, |s| s.state == DisplayState::NoArtwork).await;
        assert_eq!(cleared.request_id, RequestId::NONE);
        assert!(cleared.artwork_url.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let h = start(known_albums(), true);
        h.handle.shutdown();

        tokio::time::timeout(Duration::from_secs(2), h.task)
            .await
            .expect("actor did not stop")
            .unwrap();
        assert!(!h.handle.is_running());

        // Sending after shutdown is harmless
        h.handle.metadata_changed();
        h.handle.flush().await;
    }
}
