//! # webp-assets
//!
//! Asset-pipeline utilities for a static website: PNG → WebP conversion,
//! size-targeted re-compression of oversized WebP files, and rewriting of
//! HTML `src` attributes so pages load the WebP versions.
//!
//! # Workflow
//!
//! The four tools are independent; they only communicate through the files
//! they leave behind. The usual order is:
//!
//! ```text
//! 1. convert              *.png        →  webp/*.webp     (flattened onto white)
//!    convert-transparent  CALL ME.png  →  CALL ME.webp    (alpha kept)
//! 2. optimize             *.webp       →  *.webp          (downscaled in place if too big)
//! 3. rewrite-refs         *.html       →  *.html          (+ *.html.backup)
//! ```
//!
//! The rewriter never assumes a pending conversion: a reference is only
//! rewritten when its `.webp` already exists on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`convert`] | Batch converter: every PNG in a directory, alpha flattened |
//! | [`transparent`] | Single-file converter that keeps the alpha channel |
//! | [`optimize`] | Re-optimizer: downscale WebP files above a size budget |
//! | [`rewrite`] | Reference rewriter: `src="x.png"` → `src="x.webp"` in HTML |
//! | [`config`] | Optional `webp-assets.toml` loading, merging and validation |
//! | [`imaging`] | Decode, flatten, resize and lossy WebP encode behind a backend trait |
//! | [`scan`] | Non-recursive, glob-like file discovery |
//! | [`types`] | Shared per-file stats and batch report |
//! | [`output`] | CLI output formatting for every tool |
//!
//! # Failure Containment
//!
//! Per-file failures never abort a batch. Each driver turns a file's `Err`
//! into a `Failed` progress event and moves on; only conditions that make the
//! whole run impossible (an unreadable directory) surface as an error.
//!
//! # Sequential by Design
//!
//! One file is opened, processed and released before the next one starts.
//! Running two tools over the same directory at the same time is not
//! supported.

pub mod config;
pub mod convert;
pub mod imaging;
pub mod optimize;
pub mod output;
pub mod rewrite;
pub mod scan;
pub mod transparent;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
