//! Queue playback through the display actor.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tracing::info;

use crate::artwork::{ArtworkResolver, HttpImagePipeline, LastFmResolver};
use crate::config::{self, SharedSettings};
use crate::display::{DisplaySnapshot, DisplayState, runtime};
use crate::lastfm::LastFmClient;
use crate::playback::{LocalQueue, PlaybackSource, PlaybackState, QueueFile};

/// Step through a queue file, printing every display transition
pub fn cmd_watch(
    rt: &Runtime,
    queue_path: &Path,
    interval_ms: u64,
    enable_artwork: bool,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let mut config = config::load();
    if enable_artwork {
        config.artwork.enabled = true;
    }

    let file = QueueFile::load(queue_path)?;
    if file.tracks.is_empty() {
        anyhow::bail!("Queue file {} has no tracks", queue_path.display());
    }

    // Without artwork no lookup is ever issued, so a key is only required when enabled
    let api_key = match super::lastfm_api_key(api_key, &config) {
        Ok(key) => key,
        Err(e) if config.artwork.enabled => return Err(e.into()),
        Err(_) => String::new(),
    };
    let client = LastFmClient::with_base_url(api_key, &config.lastfm.base_url);
    let resolver: Arc<dyn ArtworkResolver> = Arc::new(LastFmResolver::new(client));

    rt.block_on(async {
        let queue = Arc::new(LocalQueue::from_file(file));
        let settings = SharedSettings::new(config);
        let (handle, task) = runtime::spawn(
            queue.clone(),
            settings,
            resolver,
            Arc::new(HttpImagePipeline::new()),
        );
        let mut snapshots = handle.subscribe();

        println!("Playing {} tracks, {}ms each.", queue.len(), interval_ms);
        println!("Press Ctrl+C to stop.\n");

        queue.set_state(PlaybackState::Playing);
        handle.metadata_changed();

        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        ticker.tick().await;
        let mut last_line = String::new();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    println!("\nStopping...");
                    break;
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    print_transition(&snapshot, &mut last_line);
                    let finished = snapshot.state == DisplayState::Stopped
                        && !snapshot.now_playing.title.is_empty();
                    if finished {
                        println!("\nEnd of queue.");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if queue.advance() {
                        info!("Advanced to track {}", queue.queue_position() + 1);
                    }
                    handle.metadata_changed();
                }
            }
        }

        // In-flight prefetches fail fast once the session is closed
        queue.close();
        handle.flush().await;
        let last = handle.snapshot();
        print_transition(&last, &mut last_line);
        info!(
            "{} lookups and loads finished, {} superseded",
            last.completions, last.stale_completions
        );

        handle.shutdown();
        let _ = task.await;
    });

    Ok(())
}

/// Print a line for the snapshot unless it shows the same thing as the last one.
fn print_transition(snapshot: &DisplaySnapshot, last_line: &mut String) {
    let line = describe(snapshot);
    if line != *last_line {
        println!("{}", line);
        *last_line = line;
    }
}

fn describe(snapshot: &DisplaySnapshot) -> String {
    let track = &snapshot.now_playing;
    match snapshot.state {
        DisplayState::Stopped => "[stopped]".to_string(),
        DisplayState::NoArtwork => format!(
            "[no artwork] {} - {} ({})",
            track.artist, track.title, track.album
        ),
        DisplayState::Artwork => {
            let size = snapshot
                .image
                .as_ref()
                .map(|image| format!(" {}x{}", image.width, image.height))
                .unwrap_or_default();
            format!(
                "[artwork{}] {} - {} ({}) {}",
                size,
                track.artist,
                track.title,
                track.album,
                snapshot.artwork_url.as_deref().unwrap_or_default()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NowPlaying;
    use crate::test_utils::mock_image;

    fn snapshot(state: DisplayState) -> DisplaySnapshot {
        DisplaySnapshot {
            state,
            now_playing: NowPlaying {
                title: "1969".to_string(),
                artist: "Boards of Canada".to_string(),
                album: "Geogaddi".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_describe_states() {
        assert_eq!(describe(&snapshot(DisplayState::Stopped)), "[stopped]");
        assert_eq!(
            describe(&snapshot(DisplayState::NoArtwork)),
            "[no artwork] Boards of Canada - 1969 (Geogaddi)"
        );

        let mut shown = snapshot(DisplayState::Artwork);
        shown.artwork_url = Some("http://x/art.jpg".to_string());
        shown.image = Some(Arc::new(mock_image("http://x/art.jpg")));
        assert_eq!(
            describe(&shown),
            "[artwork 300x300] Boards of Canada - 1969 (Geogaddi) http://x/art.jpg"
        );
    }

    #[test]
    fn test_print_transition_skips_repeats() {
        let mut last = String::new();
        let s = snapshot(DisplayState::NoArtwork);
        print_transition(&s, &mut last);
        let first = last.clone();
        print_transition(&s, &mut last);
        assert_eq!(last, first);
    }
}
