//! Artwork resolution.
//!
//! Artwork for the playing track is found in two asynchronous steps:
//!
//! 1. **Resolve** - look up an image URL for the track's artist and album
//!    ([`ArtworkResolver`], backed by Last.fm)
//! 2. **Load** - download and decode that URL ([`ImagePipeline`])
//!
//! Either step can finish after the track has already changed. Each step is
//! therefore tied to an [`ArtworkRequest`] whose id the display controller
//! checks on completion.
//!
//! # Design Principles
//!
//! - **Non-blocking**: lookups and loads run on background tasks
//! - **Abandon, don't cancel**: superseded requests run to completion and
//!   are ignored
//! - **Graceful degradation**: every failure just means "no artwork"

mod cache;
mod domain;
mod pipeline;
mod request;
mod resolver;

pub use domain::{ArtworkError, ArtworkSize, LoadedImage};
pub use pipeline::{HttpImagePipeline, ImagePipeline};
pub use request::{ArtworkKey, ArtworkRequest, Outcome, RequestId, is_current};
pub use resolver::{ArtworkResolver, LastFmResolver};
