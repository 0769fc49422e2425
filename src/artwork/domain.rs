//! Artwork domain types shared by the resolver, the image pipeline and the
//! display controller.

use serde::{Deserialize, Serialize};

/// Requested artwork resolution, named after the lookup service's size labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkSize {
    /// 34px thumbnail
    Small,
    /// 64px
    Medium,
    /// 174px
    Large,
    /// 300px
    #[serde(rename = "extralarge")]
    ExtraLarge,
    /// Largest available (default)
    #[default]
    Mega,
}

impl ArtworkSize {
    /// All sizes, smallest first.
    pub const ALL: [ArtworkSize; 5] = [
        ArtworkSize::Small,
        ArtworkSize::Medium,
        ArtworkSize::Large,
        ArtworkSize::ExtraLarge,
        ArtworkSize::Mega,
    ];

    /// Label used by the Last.fm image arrays.
    pub fn label(self) -> &'static str {
        match self {
            ArtworkSize::Small => "small",
            ArtworkSize::Medium => "medium",
            ArtworkSize::Large => "large",
            ArtworkSize::ExtraLarge => "extralarge",
            ArtworkSize::Mega => "mega",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::str::FromStr for ArtworkSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown artwork size: {s}"))
    }
}

/// Errors from artwork lookup and image loading.
///
/// None of these ever reach the host UI; the controller turns every one of
/// them into a `NoArtwork` transition.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtworkError {
    #[error("No artwork found")]
    NotFound,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}

impl ArtworkError {
    /// `NotFound` is permanent for a key; everything else may succeed on a
    /// later attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ArtworkError::NotFound)
    }
}

/// A decoded image ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Encoded bytes as downloaded (JPEG, PNG, ...)
    pub data: Vec<u8>,
}
