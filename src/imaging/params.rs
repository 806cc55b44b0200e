//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the tool drivers (which decide which files to touch) and
//! the [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing driver logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (0–100, default 85). Clamped on construction.
//! - [`ColorMode`]: Channel layout of a decoded source image.
//! - [`AlphaPolicy`]: What to do with an alpha channel: flatten it or keep it.
//! - [`ConvertParams`]: Full specification for a PNG → WebP conversion.
//! - [`ResizeParams`]: Full specification for a resize + re-encode.

use image::ColorType;
use std::fmt;
use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Channel layout of a source image, as reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    Luma,
    LumaAlpha,
    Other,
}

impl ColorMode {
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::Rgba | ColorMode::LumaAlpha)
    }
}

impl From<ColorType> for ColorMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            ColorType::L8 | ColorType::L16 => ColorMode::Luma,
            ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
            _ => ColorMode::Other,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Luma => "L",
            ColorMode::LumaAlpha => "LA",
            ColorMode::Other => "other",
        };
        f.write_str(name)
    }
}

/// How a conversion treats the source's alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaPolicy {
    /// Composite onto an opaque background and emit RGB.
    Flatten { background: [u8; 3] },
    /// Keep the alpha channel when the source has one; otherwise emit RGB.
    Preserve,
}

/// Parameters for a PNG → WebP conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
    pub alpha: AlphaPolicy,
}

/// Parameters for an exact resize followed by a WebP re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
