//! Command-line interface for artwatch.
//!
//! Provides commands for resolving artwork URLs, watching a play queue through
//! the display actor and inspecting the configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
