//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Fit into box** | [`calculate_fit_dimensions`] + `resize_exact` (Lanczos3 by default) |
//! | **Encode** | `JpegEncoder` at a fixed quality (70 by default) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining layout paths + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ResampleOutcome};
pub use calculations::calculate_fit_dimensions;
pub use operations::{Derivative, ResampleConfig, create_derivative};
pub use params::{Quality, ResampleParams, ResizeFilter};
pub use rust_backend::{RustBackend, is_supported_image};
