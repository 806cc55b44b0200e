//! Shared test utilities for the webp-assets test suite.
//!
//! Synthetic fixtures are generated in-test with the `image` crate so the
//! suite needs no binary files checked in.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_png(&tmp.path().join("logo.png"), &half_transparent(64, 32));
//! write_rgb_png(&tmp.path().join("photo.png"), 64, 32);
//! ```

use image::{DynamicImage, ImageEncoder, Rgba, RgbImage, RgbaImage};
use std::path::Path;

pub use tempfile::TempDir;

// =========================================================================
// Pixel fixtures
// =========================================================================

/// Left half opaque red, right half fully transparent.
pub fn half_transparent(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([200, 10, 10, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// RGBA image whose alpha is 255 everywhere.
pub fn fully_opaque(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
    })
}

/// Gradient RGB image; noisy enough that encoded size scales with area.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x * 7 + y * 13) % 256) as u8,
        ])
    })
}

// =========================================================================
// File writers
// =========================================================================

/// Write an RGBA buffer as PNG.
pub fn write_png(path: &Path, img: &RgbaImage) {
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
}

/// Write a gradient RGB PNG with the given dimensions.
pub fn write_rgb_png(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgb8(gradient_rgb(width, height))
        .save(path)
        .unwrap();
}

/// Write a lossy WebP with the given dimensions and return its size in bytes.
pub fn write_webp(path: &Path, width: u32, height: u32) -> u64 {
    let img = gradient_rgb(width, height);
    let encoded = webp::Encoder::new(img.as_raw(), webp::PixelLayout::Rgb, width, height)
        .encode(85.0);
    std::fs::write(path, &*encoded).unwrap();
    std::fs::metadata(path).unwrap().len()
}
