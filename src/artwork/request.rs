//! Artwork keys and resolution requests.
//!
//! A request is the unit of staleness: every completion (URL lookup or image
//! decode) carries the request that spawned it, and is only honoured if that
//! request's id is still the one the controller holds.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next id to hand out. Zero is reserved for the empty sentinel.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide, strictly increasing request identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Id carried by [`ArtworkRequest::empty`]; never allocated.
    pub const NONE: RequestId = RequestId(0);

    /// Allocate a fresh id with a single atomic increment.
    pub fn allocate() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which album's artwork is wanted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArtworkKey {
    pub artist: String,
    pub album: String,
}

impl ArtworkKey {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }

    /// A key with an empty artist or album never gets looked up.
    pub fn is_resolvable(&self) -> bool {
        !self.artist.is_empty() && !self.album.is_empty()
    }

    /// Exact, case-sensitive comparison. Unresolvable keys match nothing.
    pub fn matches(&self, artist: &str, album: &str) -> bool {
        self.is_resolvable() && self.artist == artist && self.album == album
    }
}

impl fmt::Display for ArtworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.album)
    }
}

/// How a request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Lookup produced an image URL
    Found(String),
    /// The lookup service has no artwork for this key
    NotFound,
    /// Network, API or parse failure; a later matching event may retry
    Failed,
}

/// One resolution attempt for an [`ArtworkKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRequest {
    id: RequestId,
    key: ArtworkKey,
    title: String,
    outcome: Option<Outcome>,
}

impl ArtworkRequest {
    /// Create an unresolved request with a freshly allocated id.
    pub fn new(key: ArtworkKey, title: impl Into<String>) -> Self {
        Self {
            id: RequestId::allocate(),
            key,
            title: title.into(),
            outcome: None,
        }
    }

    /// Sentinel held when no artwork should be sought.
    pub fn empty() -> Self {
        Self {
            id: RequestId::NONE,
            key: ArtworkKey::default(),
            title: String::new(),
            outcome: None,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn key(&self) -> &ArtworkKey {
        &self.key
    }

    /// Track title, for display only.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.id == RequestId::NONE
    }

    /// Resolved URL, if the lookup found one.
    pub fn url(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Found(url)) => Some(url),
            _ => None,
        }
    }

    pub fn matches(&self, artist: &str, album: &str) -> bool {
        self.key.matches(artist, album)
    }

    /// Return this request with its outcome set.
    ///
    /// Resolution is one-shot: `None` if the request already has an outcome.
    pub fn resolved(&self, outcome: Outcome) -> Option<Self> {
        if self.outcome.is_some() {
            return None;
        }
        Some(Self {
            outcome: Some(outcome),
            ..self.clone()
        })
    }
}

/// Whether a completion for `completed` may still affect state held as `current`.
pub fn is_current(current: &ArtworkRequest, completed: &ArtworkRequest) -> bool {
    !current.is_empty() && current.id == completed.id
}
