//! Shared data model.
//!
//! [`Size`] is the bounding box used by every resize step; [`Collection`] and
//! [`PictureEntry`] are what the asset pipeline produces and what ends up,
//! serialized, inside the template's `index.html`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a `WIDTHxHEIGHT` string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("Invalid resolution string: \"{0}\"")]
    Format(String),
    #[error("Invalid resolution width: \"{0}\"")]
    Width(String),
    #[error("Invalid resolution height: \"{0}\"")]
    Height(String),
}

/// A maximum bounding box in pixels.
///
/// Never an exact target: images are only scaled down, aspect ratio preserved,
/// until they fit. Both dimensions are positive, which [`Size::new`] and the
/// `FromStr` impl guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Returns `None` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }
}

impl FromStr for Size {
    type Err = SizeParseError;

    /// Parse `"960x540"`. Exactly one `x` separator, both parts positive integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            return Err(SizeParseError::Format(s.to_string()));
        }
        let width = parts[0]
            .parse::<u32>()
            .ok()
            .filter(|w| *w > 0)
            .ok_or_else(|| SizeParseError::Width(parts[0].to_string()))?;
        let height = parts[1]
            .parse::<u32>()
            .ok()
            .filter(|h| *h > 0)
            .ok_or_else(|| SizeParseError::Height(parts[1].to_string()))?;
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Size {
    type Error = SizeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.to_string()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One collection in the manifest.
///
/// `backgrounds` is the same list for every collection: backgrounds are
/// generated once and shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub title: String,
    pub pictures: Vec<PictureEntry>,
    pub backgrounds: Vec<String>,
}

/// The three artifacts produced for one source picture.
///
/// All paths are relative to the output root and `/`-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureEntry {
    /// Display-resolution derivative (`{idx}-p.jpg`).
    pub picture: String,
    /// Verbatim copy of the source (`{idx}.jpg`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullsize: Option<String>,
    /// Thumbnail derivative (`{idx}-t.jpg`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
