//! Image processing: PNG/WebP decode, flatten, resize, lossy WebP encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_decoder` (header only) |
//! | **Convert → WebP** | `image` decode + alpha policy + libwebp lossy encode |
//! | **Downscale** | `resize_exact` with Lanczos3 + libwebp lossy encode |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for ratios, sizes and dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, ImageInfo};
pub use calculations::{
    bytes_to_mb, calculate_downscale_dimensions, compression_ratio, downscale_factor,
};
pub use operations::{DownscaleConfig, convert_image, downscale_image, plan_conversion, plan_downscale};
pub use params::{AlphaPolicy, ColorMode, ConvertParams, Quality, ResizeParams};
pub use rust_backend::RustBackend;
