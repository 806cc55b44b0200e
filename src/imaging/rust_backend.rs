//! Production image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Flatten onto background | per-pixel alpha blend over `RgbaImage` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → lossy WebP | `webp` crate (libwebp), lossless disabled |
//!
//! The `image` crate can only write lossless WebP, which defeats the point of
//! the quality setting, so encoding goes through libwebp.

use super::backend::{BackendError, ImageBackend, ImageInfo};
use super::calculations::blend_channel;
use super::params::{AlphaPolicy, ColorMode, ConvertParams, Quality, ResizeParams};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader, RgbImage, RgbaImage};
use std::path::Path;

/// Backend using the `image` crate for decoding and libwebp for encoding.
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

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn info_of(img: &DynamicImage) -> ImageInfo {
    let (width, height) = img.dimensions();
    ImageInfo {
        width,
        height,
        mode: ColorMode::from(img.color()),
    }
}

/// Composite an image onto an opaque background using its alpha as mask.
pub fn flatten_onto(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        image::Rgb([
            blend_channel(r, background[0], a),
            blend_channel(g, background[1], a),
            blend_channel(b, background[2], a),
        ])
    })
}

/// Pixel data ready for the WebP encoder.
pub enum EncodeInput {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl EncodeInput {
    /// Prepare a decoded image for encoding under the given alpha policy.
    ///
    /// Sources without alpha always become RGB, whatever the policy.
    pub fn prepare(img: &DynamicImage, policy: AlphaPolicy) -> Self {
        let has_alpha = img.color().has_alpha();
        match policy {
            AlphaPolicy::Flatten { background } if has_alpha => {
                EncodeInput::Rgb(flatten_onto(img, background))
            }
            AlphaPolicy::Preserve if has_alpha => EncodeInput::Rgba(img.to_rgba8()),
            _ => EncodeInput::Rgb(img.to_rgb8()),
        }
    }

    /// Like [`prepare`](Self::prepare) but keeping alpha when present.
    fn keep_channels(img: &DynamicImage) -> Self {
        Self::prepare(img, AlphaPolicy::Preserve)
    }
}

/// Encode pixels as lossy WebP (lossless explicitly disabled).
pub fn encode_webp(input: &EncodeInput, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let q = quality.value() as f32;
    let encoded = match input {
        EncodeInput::Rgb(buf) => {
            webp::Encoder::new(buf.as_raw(), webp::PixelLayout::Rgb, buf.width(), buf.height())
                .encode_simple(false, q)
        }
        EncodeInput::Rgba(buf) => {
            webp::Encoder::new(buf.as_raw(), webp::PixelLayout::Rgba, buf.width(), buf.height())
                .encode_simple(false, q)
        }
    }
    .map_err(|e| BackendError::Encode(format!("{e:?}")))?;
    Ok(encoded.to_vec())
}

fn save_webp(input: &EncodeInput, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let bytes = encode_webp(input, quality)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let decoder = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_decoder()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let (width, height) = image::ImageDecoder::dimensions(&decoder);
        let mode = ColorMode::from(image::ImageDecoder::color_type(&decoder));
        Ok(ImageInfo {
            width,
            height,
            mode,
        })
    }

    fn convert(&self, params: &ConvertParams) -> Result<ImageInfo, BackendError> {
        let img = load_image(&params.source)?;
        let info = info_of(&img);
        let input = EncodeInput::prepare(&img, params.alpha);
        save_webp(&input, &params.output, params.quality)?;
        Ok(info)
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Invalid target size {}x{}",
                params.width, params.height
            )));
        }
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_webp(
            &EncodeInput::keep_channels(&resized),
            &params.output,
            params.quality,
        )
    }
}
