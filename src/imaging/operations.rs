//! High-level image operations.
//!
//! These functions combine calculations with backend execution. Planning is
//! split from execution so parameter generation can be tested without codecs.

use super::backend::{BackendError, ImageBackend, ImageInfo};
use super::calculations::{bytes_to_mb, calculate_downscale_dimensions};
use super::params::{AlphaPolicy, ConvertParams, Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a PNG → WebP conversion.
pub fn plan_conversion(
    source: &Path,
    output: &Path,
    quality: Quality,
    alpha: AlphaPolicy,
) -> ConvertParams {
    ConvertParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        quality,
        alpha,
    }
}

/// Convert one image through the backend, returning the source info.
pub fn convert_image(backend: &impl ImageBackend, params: &ConvertParams) -> Result<ImageInfo> {
    backend.convert(params)
}

/// Budget for the size-targeted downscale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownscaleConfig {
    /// Files strictly larger than this (in MB) are shrunk toward it.
    pub max_size_mb: f64,
    pub quality: Quality,
}

/// Plan a size-driven downscale.
///
/// Returns `None` when the file is already at or below the budget.
pub fn plan_downscale(
    source: &Path,
    output: &Path,
    original_dims: (u32, u32),
    file_bytes: u64,
    config: &DownscaleConfig,
) -> Option<ResizeParams> {
    let size_mb = bytes_to_mb(file_bytes);
    if size_mb <= config.max_size_mb {
        return None;
    }
    let (width, height) = calculate_downscale_dimensions(original_dims, size_mb, config.max_size_mb);
    Some(ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    })
}

/// Execute a planned downscale.
pub fn downscale_image(backend: &impl ImageBackend, params: &ResizeParams) -> Result<()> {
    backend.resize(params)
}
