//! Artwatch - now-playing artwork display core.
//!
//! Resolves album artwork for a play queue from Last.fm and drives a
//! staleness-guarded display state machine that tolerates rapid track changes
//! and out-of-order network completions. Used via CLI commands.

pub mod artwork;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod lastfm;
pub mod playback;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let directive: Directive = "artwatch=info".parse()?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive(directive))
        .init();

    cli::run_command(&args)
}
