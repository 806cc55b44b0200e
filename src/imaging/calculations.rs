//! Pure calculation functions for sizes, ratios and dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to megabytes (1 MB = 1024² bytes).
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Percentage size reduction: `(1 - output / original) * 100`.
///
/// Returns `None` when `original` is zero, where the ratio is undefined.
/// Negative values mean the output grew.
pub fn compression_ratio(original: u64, output: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((1.0 - output as f64 / original as f64) * 100.0)
}

/// Linear scale factor that brings a file of `size_mb` down to `max_size_mb`.
///
/// File size is treated as roughly proportional to pixel area at a fixed
/// quality, so the per-dimension factor is the square root of the size ratio.
pub fn downscale_factor(size_mb: f64, max_size_mb: f64) -> f64 {
    (max_size_mb / size_mb).sqrt()
}

/// Calculate target dimensions for a size-driven downscale.
///
/// Each dimension is `floor(dim * sqrt(max / size))`, computed independently,
/// and never drops below 1 pixel.
///
/// # Examples
/// ```
/// # use webp_assets::imaging::calculate_downscale_dimensions;
/// // 0.5 MB against a 0.3 MB budget → factor sqrt(0.6)
/// assert_eq!(calculate_downscale_dimensions((1000, 800), 0.5, 0.3), (774, 619));
/// ```
pub fn calculate_downscale_dimensions(
    original: (u32, u32),
    size_mb: f64,
    max_size_mb: f64,
) -> (u32, u32) {
    let (w, h) = original;
    let factor = downscale_factor(size_mb, max_size_mb);
    let scale = |dim: u32| ((dim as f64 * factor).floor() as u32).max(1);
    (scale(w), scale(h))
}

/// Blend one 8-bit channel over a background channel using `alpha` as mask.
///
/// Fully opaque keeps `value`, fully transparent yields `background`.
pub fn blend_channel(value: u8, background: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    let mixed = value as u32 * a + background as u32 * (255 - a);
    ((mixed + 127) / 255) as u8
}
