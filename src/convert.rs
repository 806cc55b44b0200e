//! Batch PNG → WebP conversion.
//!
//! Every `*.png` directly inside the working directory becomes
//! `<output_dir>/<stem>.webp`. Transparent sources are flattened onto an
//! opaque background, so every output is RGB.
//!
//! ## Failure policy
//!
//! A file that cannot be read, decoded or encoded is reported through a
//! [`ConvertEvent::Failed`] event and skipped; it does not count toward the
//! success total and never aborts the batch. Only an unreadable directory or
//! an output directory that cannot be created fails the whole run.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── hero.png
//! ├── logo.png
//! └── webp/            # created once, on the first run that finds PNGs
//!     ├── hero.webp
//!     └── logo.webp
//! ```

use crate::config::ConvertConfig;
use crate::imaging::{
    AlphaPolicy, BackendError, ImageBackend, ImageInfo, Quality, RustBackend, convert_image,
    plan_conversion,
};
use crate::scan::{display_name, file_size, files_with_extension};
use crate::types::{ConversionReport, FileStats};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Imaging(#[from] BackendError),
}

/// Progress events emitted during a batch conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertEvent {
    /// PNG files found in the directory.
    Discovered { count: usize },
    /// The output directory did not exist and was created.
    OutputDirCreated { path: String },
    Converted {
        source: String,
        output: String,
        stats: FileStats,
    },
    Failed { source: String, error: String },
}

/// Convert one PNG and measure the result.
///
/// Returns the decoded source's info alongside the byte counts.
pub fn convert_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    quality: Quality,
    alpha: AlphaPolicy,
) -> Result<(ImageInfo, FileStats), ConvertError> {
    if !source.exists() {
        return Err(ConvertError::NotFound(source.to_path_buf()));
    }
    let params = plan_conversion(source, output, quality, alpha);
    let info = convert_image(backend, &params)?;
    let stats = FileStats {
        original_bytes: file_size(source)?,
        output_bytes: file_size(output)?,
    };
    Ok((info, stats))
}

/// Convert every PNG in `dir` with the production backend.
///
/// Returns `Ok(None)` when the directory holds no PNG files; in that case
/// nothing is created.
pub fn convert_directory(
    dir: &Path,
    config: &ConvertConfig,
    events: Option<Sender<ConvertEvent>>,
) -> Result<Option<ConversionReport>, ConvertError> {
    convert_directory_with_backend(&RustBackend::new(), dir, config, events)
}

/// Convert every PNG in `dir` using a specific backend (allows testing with mock).
pub fn convert_directory_with_backend(
    backend: &impl ImageBackend,
    dir: &Path,
    config: &ConvertConfig,
    events: Option<Sender<ConvertEvent>>,
) -> Result<Option<ConversionReport>, ConvertError> {
    let emit = |event: ConvertEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let sources = files_with_extension(dir, "png")?;
    if sources.is_empty() {
        return Ok(None);
    }
    emit(ConvertEvent::Discovered {
        count: sources.len(),
    });

    let output_dir = dir.join(&config.output_dir);
    if !output_dir.is_dir() {
        std::fs::create_dir_all(&output_dir)?;
        emit(ConvertEvent::OutputDirCreated {
            path: config.output_dir.display().to_string(),
        });
    }

    let quality = Quality::new(config.quality);
    let alpha = AlphaPolicy::Flatten {
        background: config.background,
    };
    let mut report = ConversionReport::new(sources.len());

    for source in &sources {
        let output = webp_output_path(&output_dir, source);
        match convert_file(backend, source, &output, quality, alpha) {
            Ok((_, stats)) => {
                report.record_success(stats);
                emit(ConvertEvent::Converted {
                    source: display_name(source),
                    output: display_name(&output),
                    stats,
                });
            }
            Err(e) => emit(ConvertEvent::Failed {
                source: display_name(source),
                error: e.to_string(),
            }),
        }
    }

    Ok(Some(report))
}

/// `<output_dir>/<stem>.webp` for a source file.
pub fn webp_output_path(output_dir: &Path, source: &Path) -> PathBuf {
    let mut name = source
        .file_stem()
        .unwrap_or(source.as_os_str())
        .to_os_string();
    name.push(".webp");
    output_dir.join(name)
}
