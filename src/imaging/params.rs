//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what images to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 70). Clamped on construction.
//! - [`ResizeFilter`]: Resampling filter used when an image has to shrink.
//! - [`ResampleParams`]: Everything one derivative needs: paths, bounding box, quality and filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(70)
    }
}

/// Resampling filter applied when a picture is scaled down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    #[default]
    Lanczos3,
    Gaussian,
    Nearest,
    Cubic,
    Linear,
}

impl ResizeFilter {
    pub const NAMES: &'static [&'static str] = &["lanczos3", "gaussian", "nearest", "cubic", "linear"];

    pub fn name(self) -> &'static str {
        match self {
            ResizeFilter::Lanczos3 => "lanczos3",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Cubic => "cubic",
            ResizeFilter::Linear => "linear",
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lanczos3" => Ok(ResizeFilter::Lanczos3),
            "gaussian" => Ok(ResizeFilter::Gaussian),
            "nearest" => Ok(ResizeFilter::Nearest),
            "cubic" => Ok(ResizeFilter::Cubic),
            "linear" => Ok(ResizeFilter::Linear),
            other => Err(format!(
                "Invalid resize filter \"{}\". Valid options: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for producing one bounded JPEG derivative.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bounding box; the result fits inside, it is never upscaled.
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    pub filter: ResizeFilter,
}
