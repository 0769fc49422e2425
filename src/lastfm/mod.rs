//! Last.fm integration
//!
//! Resolves album cover URLs through `album.getinfo`. Only the URL is
//! looked up here; downloading the image is the image pipeline's job.

mod client;
pub mod dto;

pub use client::{DEFAULT_BASE_URL, LastFmClient, pick_image};
