//! High-level image operations.
//!
//! These functions combine layout paths with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, ResampleParams, ResizeFilter};
use crate::naming::to_output_path;
use crate::types::Size;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Encoding settings shared by every derivative of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResampleConfig {
    pub quality: Quality,
    pub filter: ResizeFilter,
}

/// A written derivative: its manifest path and final pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivative {
    /// `/`-joined path relative to the output root.
    pub path: String,
    pub dimensions: Dimensions,
    /// `false` when the source already fit the box and was only re-encoded.
    pub resized: bool,
}

/// Plan a resample operation without executing it.
pub fn plan_resample(
    source: &Path,
    output_root: &Path,
    relative: &str,
    bound: Size,
    config: &ResampleConfig,
) -> ResampleParams {
    ResampleParams {
        source: source.to_path_buf(),
        output: to_output_path(output_root, relative),
        max_width: bound.width,
        max_height: bound.height,
        quality: config.quality,
        filter: config.filter,
    }
}

/// Produce one bounded derivative of `source` at `relative` under `output_root`.
pub fn create_derivative(
    backend: &impl ImageBackend,
    source: &Path,
    output_root: &Path,
    relative: &str,
    bound: Size,
    config: &ResampleConfig,
) -> Result<Derivative> {
    let params = plan_resample(source, output_root, relative, bound, config);
    let outcome = backend.resample(&params)?;
    Ok(Derivative {
        path: relative.to_string(),
        dimensions: outcome.output,
        resized: outcome.resized(),
    })
}
