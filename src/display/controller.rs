//! Staleness-guarded artwork display state machine.
//!
//! The controller is plain synchronous state: every entry point returns the
//! async work it wants done as a [`Command`], and the owner feeds the results
//! back through [`on_resolved`](DisplayController::on_resolved) and
//! [`on_image_loaded`](DisplayController::on_image_loaded). Both completion
//! points compare the originating request id with the held one, so a lookup or
//! decode that outlives its track can never overwrite newer state.

use std::sync::Arc;

use super::state::{Command, Completion, DisplayState, MetadataUpdate};
use crate::artwork::{
    self, ArtworkError, ArtworkKey, ArtworkRequest, ArtworkSize, LoadedImage, Outcome,
};

#[derive(Debug)]
pub struct DisplayController {
    current: ArtworkRequest,
    mode: DisplayState,
    /// URL most recently handed to the image pipeline for display
    last_loaded_url: Option<String>,
    displayed: Option<Arc<LoadedImage>>,
    playback_stopped: bool,
    suspended: bool,
    size: ArtworkSize,
    render_size: (u32, u32),
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new(ArtworkSize::default(), (600, 600))
    }
}

impl DisplayController {
    pub fn new(size: ArtworkSize, render_size: (u32, u32)) -> Self {
        Self {
            current: ArtworkRequest::empty(),
            mode: DisplayState::Stopped,
            last_loaded_url: None,
            displayed: None,
            playback_stopped: true,
            suspended: false,
            size,
            render_size,
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// React to new track metadata, a playback state change or a settings change.
    pub fn on_metadata_or_settings_changed(&mut self, update: &MetadataUpdate) -> Option<Command> {
        if self.suspended {
            tracing::debug!("Display suspended, ignoring metadata event");
            return None;
        }
        self.apply(update)
    }

    /// Apply a finished URL lookup.
    pub fn on_resolved(
        &mut self,
        completed: &ArtworkRequest,
        result: Result<String, ArtworkError>,
    ) -> Completion {
        if !self.is_current(completed) {
            tracing::debug!(
                "Dropping stale resolution for request {} ({})",
                completed.id(),
                completed.key()
            );
            return Completion::Stale;
        }

        let outcome = match result {
            Ok(url) if url.is_empty() => Outcome::NotFound,
            Ok(url) => Outcome::Found(url),
            Err(e) if !e.is_transient() => Outcome::NotFound,
            Err(e) => {
                tracing::warn!("Artwork lookup failed for {}: {}", completed.key(), e);
                Outcome::Failed
            }
        };

        let Some(resolved) = self.current.resolved(outcome) else {
            tracing::debug!("Request {} already resolved, ignoring", completed.id());
            return Completion::Applied(None);
        };
        self.current = resolved;

        match self.current.url().map(str::to_string) {
            Some(url) => Completion::Applied(self.load_if_needed(url)),
            None => {
                self.last_loaded_url = None;
                self.show_no_artwork();
                Completion::Applied(None)
            }
        }
    }

    /// Apply a finished image download and decode.
    pub fn on_image_loaded(
        &mut self,
        request: &ArtworkRequest,
        result: Result<LoadedImage, ArtworkError>,
    ) -> Completion {
        if !self.is_current(request) {
            tracing::debug!("Dropping stale image for request {}", request.id());
            return Completion::Stale;
        }

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Artwork image failed to load for {}: {}", request.key(), e);
                self.last_loaded_url = None;
                self.show_no_artwork();
                return Completion::Applied(None);
            }
        };

        if self.playback_stopped {
            tracing::debug!(
                "Playback stopped, not displaying image for request {}",
                request.id()
            );
            return Completion::Applied(None);
        }

        let already_shown = self.mode == DisplayState::Artwork
            && self.current_artwork_url() == Some(image.url.as_str());

        self.displayed = Some(Arc::new(image));
        self.set_mode(DisplayState::Artwork);

        if self.suspended || already_shown {
            return Completion::Applied(None);
        }

        let (width, height) = self.render_size;
        Completion::Applied(Some(Command::Prefetch {
            current: self.current.key().clone(),
            size: self.size,
            width,
            height,
        }))
    }

    /// Stop reacting to metadata events. In-flight work keeps running.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Start reacting again and re-apply present conditions.
    pub fn resume(&mut self, update: &MetadataUpdate) -> Option<Command> {
        self.suspended = false;
        self.apply(update)
    }

    /// Forget the held request and show metadata without artwork.
    pub fn clear(&mut self) {
        if self.suspended {
            return;
        }
        self.current = ArtworkRequest::empty();
        self.last_loaded_url = None;
        self.set_mode(DisplayState::NoArtwork);
    }

    pub fn set_render_size(&mut self, width: u32, height: u32) {
        self.render_size = (width, height);
    }

    /// Size used by lookups issued from now on.
    pub fn set_artwork_size(&mut self, size: ArtworkSize) {
        self.size = size;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn display_state(&self) -> DisplayState {
        self.mode
    }

    /// URL of the image on screen. `None` unless in [`DisplayState::Artwork`].
    pub fn current_artwork_url(&self) -> Option<&str> {
        self.displayed.as_ref().map(|image| image.url.as_str())
    }

    pub fn displayed_image(&self) -> Option<Arc<LoadedImage>> {
        self.displayed.clone()
    }

    pub fn current_request(&self) -> &ArtworkRequest {
        &self.current
    }

    pub fn is_current(&self, request: &ArtworkRequest) -> bool {
        artwork::is_current(&self.current, request)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn apply(&mut self, update: &MetadataUpdate) -> Option<Command> {
        self.playback_stopped = update.playback_stopped;

        if update.playback_stopped {
            self.set_mode(DisplayState::Stopped);
            return None;
        }

        if !update.artwork_enabled || update.artist.is_empty() || update.album.is_empty() {
            self.current = ArtworkRequest::empty();
            self.last_loaded_url = None;
            self.set_mode(DisplayState::NoArtwork);
            return None;
        }

        if !self.current.matches(&update.artist, &update.album) {
            let key = ArtworkKey::new(update.artist.as_str(), update.album.as_str());
            return Some(self.replace_request(key, &update.title));
        }

        self.update_artwork()
    }

    /// Key unchanged: decide from the held request's outcome.
    fn update_artwork(&mut self) -> Option<Command> {
        match self.current.outcome().cloned() {
            // Lookup still in flight
            None => {
                self.reapply_mode();
                None
            }
            Some(Outcome::Failed) => Some(self.retry()),
            // Coming back from Stopped gives a not-found key one more try
            Some(Outcome::NotFound) if self.mode == DisplayState::Stopped => Some(self.retry()),
            Some(Outcome::NotFound) => {
                self.set_mode(DisplayState::NoArtwork);
                None
            }
            Some(Outcome::Found(url)) => self.load_if_needed(url),
        }
    }

    fn load_if_needed(&mut self, url: String) -> Option<Command> {
        if self.playback_stopped {
            return None;
        }

        let changed = self.last_loaded_url.as_deref() != Some(url.as_str());
        if changed || self.mode == DisplayState::Stopped {
            self.last_loaded_url = Some(url.clone());
            self.reapply_mode();
            return Some(Command::LoadImage {
                request: self.current.clone(),
                url,
            });
        }

        self.reapply_mode();
        None
    }

    fn replace_request(&mut self, key: ArtworkKey, title: &str) -> Command {
        let request = ArtworkRequest::new(key, title);
        tracing::debug!("New artwork request {} for {}", request.id(), request.key());

        self.current = request.clone();
        self.last_loaded_url = None;
        // The new request has no URL yet; never leave the old cover under a new title
        self.set_mode(DisplayState::NoArtwork);

        Command::Resolve {
            request,
            size: self.size,
        }
    }

    fn retry(&mut self) -> Command {
        let key = self.current.key().clone();
        let title = self.current.title().to_string();
        self.replace_request(key, &title)
    }

    /// Keep the current mode, except that Stopped no longer holds once playing.
    fn reapply_mode(&mut self) {
        if self.mode == DisplayState::Stopped && !self.playback_stopped {
            self.set_mode(DisplayState::NoArtwork);
        }
    }

    fn show_no_artwork(&mut self) {
        if !self.playback_stopped {
            self.set_mode(DisplayState::NoArtwork);
        }
    }

    fn set_mode(&mut self, mode: DisplayState) {
        if mode != DisplayState::Artwork {
            self.displayed = None;
        }
        if self.mode != mode {
            tracing::debug!("Display state {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}
