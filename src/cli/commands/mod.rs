//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `resolve`: one-off artwork URL lookup
//! - `watch`: step through a queue file and print display transitions
//! - `config`: show or toggle the configuration

mod config;
mod resolve;
mod watch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::artwork::ArtworkSize;
use crate::config::{Config, ConfigError};

pub use config::cmd_config;
pub use resolve::cmd_resolve;
pub use watch::cmd_watch;

/// Artwatch CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Look up the artwork URL for an album
    Resolve {
        /// Album artist
        #[arg(long)]
        artist: String,
        /// Album title
        #[arg(long)]
        album: String,
        /// Image size (small, medium, large, extralarge, mega)
        #[arg(long, default_value = "mega")]
        size: ArtworkSize,
        /// Last.fm API key (or set LASTFM_API_KEY env var)
        #[arg(short, long, env = "LASTFM_API_KEY")]
        api_key: Option<String>,
    },
    /// Play through a queue file and print what the now-playing area shows
    Watch {
        /// Queue file ([[tracks]] with title/artist/album)
        queue: PathBuf,
        /// Time spent on each track, in milliseconds
        #[arg(long, default_value = "5000")]
        interval_ms: u64,
        /// Turn artwork on for this run regardless of the config file
        #[arg(long)]
        enable_artwork: bool,
        /// Last.fm API key (or set LASTFM_API_KEY env var)
        #[arg(short, long, env = "LASTFM_API_KEY")]
        api_key: Option<String>,
    },
    /// Show the effective configuration, optionally toggling artwork
    Config {
        /// Enable artwork and save
        #[arg(long, conflicts_with = "disable_artwork")]
        enable_artwork: bool,
        /// Disable artwork and save
        #[arg(long)]
        disable_artwork: bool,
    },
}

/// Run the parsed command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Resolve {
            artist,
            album,
            size,
            api_key,
        } => cmd_resolve(&rt, artist, album, *size, api_key.as_deref()),
        Commands::Watch {
            queue,
            interval_ms,
            enable_artwork,
            api_key,
        } => cmd_watch(
            &rt,
            queue,
            *interval_ms,
            *enable_artwork,
            api_key.as_deref(),
        ),
        Commands::Config {
            enable_artwork,
            disable_artwork,
        } => cmd_config(*enable_artwork, *disable_artwork),
    }
}

/// API key from the command line or environment, falling back to the config file.
fn lastfm_api_key(arg: Option<&str>, config: &Config) -> Result<String, ConfigError> {
    arg.map(str::to_string)
        .or_else(|| config.lastfm.api_key.clone())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
