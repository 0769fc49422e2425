//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\artwatch\config.toml
//! - macOS: ~/Library/Application Support/artwatch/config.toml
//! - Linux: ~/.config/artwatch/config.toml
//!
//! The config file is human-readable and editable. Missing fields fall back
//! to defaults; a missing or broken file yields the default config.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::artwork::ArtworkSize;
use crate::lastfm::DEFAULT_BASE_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artwork display settings
    pub artwork: ArtworkConfig,

    /// Last.fm lookup settings
    pub lastfm: LastFmConfig,
}

/// Artwork display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkConfig {
    /// Whether artwork is looked up at all (off by default)
    pub enabled: bool,

    /// Image size requested from the lookup service
    pub size: ArtworkSize,

    /// Render width used when pre-warming the next track's artwork
    pub render_width: u32,

    /// Render height used when pre-warming the next track's artwork
    pub render_height: u32,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: ArtworkSize::Mega,
            render_width: 600,
            render_height: 600,
        }
    }
}

/// Last.fm settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LastFmConfig {
    /// API key (https://www.last.fm/api/account/create)
    pub api_key: Option<String>,

    /// API endpoint
    pub base_url: String,
}

impl Default for LastFmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ============================================================================
// Shared settings
// ============================================================================

/// Live settings shared between the CLI/UI and the display actor.
///
/// The display actor reads [`artwork_enabled`](Self::artwork_enabled) on every
/// metadata event instead of caching it, so toggling takes effect on the next
/// event.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<Config>>,
}

impl SharedSettings {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn artwork_enabled(&self) -> bool {
        self.inner.read().artwork.enabled
    }

    pub fn set_artwork_enabled(&self, enabled: bool) {
        self.inner.write().artwork.enabled = enabled;
    }

    pub fn artwork_size(&self) -> ArtworkSize {
        self.inner.read().artwork.size
    }

    pub fn render_size(&self) -> (u32, u32) {
        let config = self.inner.read();
        (config.artwork.render_width, config.artwork.render_height)
    }

    /// Copy of the whole configuration.
    pub fn snapshot(&self) -> Config {
        self.inner.read().clone()
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artwatch"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`]
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error(
        "No Last.fm API key configured (set lastfm.api_key, LASTFM_API_KEY or --api-key)"
    )]
    MissingApiKey,
}

// ============================================================================
// Tests
// ============================================================================
