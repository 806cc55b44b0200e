//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, convert, and resize.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): `image` crate decoders
//! plus libwebp (via the `webp` crate) for lossy encoding.

use super::params::{ColorMode, ConvertParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("WebP encode failed: {0}")]
    Encode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
}

impl ImageInfo {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Each operation opens its source, does its work and releases everything
/// before returning, so callers never hold an image across files.
pub trait ImageBackend {
    /// Get image dimensions and color mode.
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Decode the source, apply the alpha policy and write lossy WebP.
    ///
    /// Returns the info of the *source* image.
    fn convert(&self, params: &ConvertParams) -> Result<ImageInfo, BackendError>;

    /// Resize the source to exact dimensions and write lossy WebP.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
