//! One-off artwork lookup.

use anyhow::Context;
use tokio::runtime::Runtime;

use crate::artwork::{
    ArtworkError, ArtworkKey, ArtworkRequest, ArtworkResolver, ArtworkSize, LastFmResolver,
};
use crate::config;
use crate::lastfm::LastFmClient;

/// Resolve and print the artwork URL for an album
pub fn cmd_resolve(
    rt: &Runtime,
    artist: &str,
    album: &str,
    size: ArtworkSize,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = super::lastfm_api_key(api_key, &config)?;

    let client = LastFmClient::with_base_url(api_key, &config.lastfm.base_url);
    let resolver = LastFmResolver::new(client);
    let request = ArtworkRequest::new(ArtworkKey::new(artist, album), "");

    rt.block_on(async {
        match resolver.resolve(&request, size).await {
            Ok(url) => println!("{}", url),
            Err(ArtworkError::NotFound) => println!("not found"),
            Err(e) => {
                return Err(e).with_context(|| format!("resolving artwork for {}", request.key()));
            }
        }
        Ok(())
    })
}
