//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the pipeline and the codec:
//! decode a source, fit it into a bounding box, re-encode it as JPEG.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust, built on the
//! `image` crate. Tests use a recording mock.

use super::params::ResampleParams;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while producing a derivative. Each variant is a distinct failure
/// site so the caller can map it to its own exit status.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Could not open image \"{}\": {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not decode image \"{}\": {message}", .path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Could not create file \"{}\": {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not encode image \"{}\": {message}", .path.display())]
    Encode { path: PathBuf, message: String },
}

impl BackendError {
    pub fn exit_code(&self) -> i32 {
        match self {
            BackendError::Open { .. } => 19,
            BackendError::Decode { .. } => 20,
            BackendError::Create { .. } => 21,
            BackendError::Encode { .. } => 22,
        }
    }
}

/// Pixel dimensions of a decoded or written image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// What a resample call did: the decoded source size and the written size.
///
/// `output == source` means the source already fit and was only re-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleOutcome {
    pub source: Dimensions,
    pub output: Dimensions,
}

impl ResampleOutcome {
    pub fn resized(&self) -> bool {
        self.source != self.output
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decode `params.source`, shrink it into the bounding box if it exceeds
    /// it, and write it to `params.output` as JPEG at `params.quality`.
    ///
    /// Images that already fit are still re-encoded.
    fn resample(&self, params: &ResampleParams) -> Result<ResampleOutcome, BackendError>;
}
