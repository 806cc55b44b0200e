//! Single-file, transparency-preserving PNG → WebP conversion.
//!
//! Unlike the batch converter, an alpha channel is kept as-is: no background
//! composite. Sources without alpha are written as RGB. Encoding is lossy
//! even when alpha is present.

use crate::config::TransparentConfig;
use crate::convert::{ConvertError, convert_file};
use crate::imaging::{AlphaPolicy, ColorMode, ImageBackend, Quality, RustBackend};
use crate::types::FileStats;
use std::path::{Path, PathBuf};

/// Outcome of a successful transparent conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct TransparentConversion {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Channel layout of the decoded source.
    pub mode: ColorMode,
    pub stats: FileStats,
}

impl TransparentConversion {
    /// Whether the source carried an alpha channel, and so the output does.
    pub fn transparency(&self) -> bool {
        self.mode.has_alpha()
    }
}

/// Convert the configured file, resolving paths against `dir`.
pub fn convert_transparent(
    dir: &Path,
    config: &TransparentConfig,
) -> Result<TransparentConversion, ConvertError> {
    convert_transparent_with_backend(
        &RustBackend::new(),
        &dir.join(&config.input),
        &dir.join(config.output_path()),
        Quality::new(config.quality),
    )
}

/// Convert one file keeping its alpha channel (allows testing with mock).
///
/// A missing input is reported as [`ConvertError::NotFound`] by
/// [`convert_file`] before any decoding is attempted.
pub fn convert_transparent_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    quality: Quality,
) -> Result<TransparentConversion, ConvertError> {
    let (info, stats) = convert_file(backend, source, output, quality, AlphaPolicy::Preserve)?;
    Ok(TransparentConversion {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        mode: info.mode,
        stats,
    })
}
