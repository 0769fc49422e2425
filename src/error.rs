//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`ArtworkError`](crate::artwork::ArtworkError),
//! [`PlaybackError`](crate::playback::PlaybackError),
//! [`ConfigError`](crate::config::ConfigError)), while the CLI uses
//! `anyhow` for convenient error propagation.
//!
//! The display controller never returns errors at all: every artwork failure
//! ends in a `NoArtwork` transition. This hierarchy is for the code around it
//! (loading queue files, talking to the lookup service from the CLI).

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Artwork lookup or load error
    #[error("Artwork error: {0}")]
    Artwork(#[from] crate::artwork::ArtworkError),

    /// Playback source error
    #[error("Playback error: {0}")]
    Playback(#[from] crate::playback::PlaybackError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::artwork::ArtworkError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Artwork(e).context(ctx))
    }
}
