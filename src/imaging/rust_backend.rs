//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG) | `image::ImageReader` |
//! | Resize | `DynamicImage::resize_exact` with the configured filter (Lanczos3 by default) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, Dimensions, ImageBackend, ResampleOutcome};
use super::calculations::calculate_fit_dimensions;
use super::params::{Quality, ResampleParams, ResizeFilter};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Extensions recognized as pictures, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Returns `true` if `path` has a recognized picture extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Cubic => FilterType::CatmullRom,
            ResizeFilter::Linear => FilterType::Triangle,
        }
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let reader = ImageReader::open(path).map_err(|source| BackendError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|source| BackendError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    reader.decode().map_err(|e| BackendError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Encode as baseline JPEG and write to `path`.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(|source| BackendError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);

    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    writer.flush().map_err(|e| BackendError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl ImageBackend for RustBackend {
    fn resample(&self, params: &ResampleParams) -> Result<ResampleOutcome, BackendError> {
        let img = load_image(&params.source)?;
        let source = Dimensions {
            width: img.width(),
            height: img.height(),
        };

        let img = match calculate_fit_dimensions(
            (source.width, source.height),
            (params.max_width, params.max_height),
        ) {
            Some((width, height)) => img.resize_exact(width, height, params.filter.into()),
            None => img,
        };

        save_jpeg(&img, &params.output, params.quality)?;

        Ok(ResampleOutcome {
            source,
            output: Dimensions {
                width: img.width(),
                height: img.height(),
            },
        })
    }
}
