//! Size-targeted re-compression of existing WebP files.
//!
//! Any `*.webp` larger than the budget is downscaled by
//! `sqrt(max_size_mb / size_mb)` per dimension and re-encoded at the fixed
//! quality. This is a single-pass approximation: the new size is reported but
//! not re-checked, so content that compresses unusually may still land above
//! the budget.
//!
//! Files at or below the budget are never opened for writing.

use crate::config::OptimizeConfig;
use crate::imaging::{
    BackendError, DownscaleConfig, ImageBackend, Quality, RustBackend, bytes_to_mb,
    downscale_image, plan_downscale,
};
use crate::scan::{display_name, file_size, files_with_extension};
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Imaging(#[from] BackendError),
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeOutcome {
    /// Already within budget; left untouched.
    AlreadySmall { size_mb: f64 },
    Resized {
        before_mb: f64,
        after_mb: f64,
        from: (u32, u32),
        to: (u32, u32),
    },
}

/// Progress events emitted while optimizing a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeEvent {
    Started,
    File {
        file: String,
        outcome: OptimizeOutcome,
    },
    Failed {
        file: String,
        error: String,
    },
    Finished,
}

impl From<&OptimizeConfig> for DownscaleConfig {
    fn from(config: &OptimizeConfig) -> Self {
        DownscaleConfig {
            max_size_mb: config.max_size_mb,
            quality: Quality::new(config.quality),
        }
    }
}

/// Shrink `input` into `output` when it exceeds the budget.
///
/// `output` may equal `input` for an in-place rewrite.
pub fn optimize_file(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    config: &DownscaleConfig,
) -> Result<OptimizeOutcome, OptimizeError> {
    let bytes = file_size(input)?;
    let size_mb = bytes_to_mb(bytes);
    if size_mb <= config.max_size_mb {
        return Ok(OptimizeOutcome::AlreadySmall { size_mb });
    }

    let info = backend.identify(input)?;
    let Some(params) = plan_downscale(input, output, info.dimensions(), bytes, config) else {
        return Ok(OptimizeOutcome::AlreadySmall { size_mb });
    };
    downscale_image(backend, &params)?;

    Ok(OptimizeOutcome::Resized {
        before_mb: size_mb,
        after_mb: bytes_to_mb(file_size(output)?),
        from: info.dimensions(),
        to: (params.width, params.height),
    })
}

/// Optimize every WebP in `dir`, in place, with the production backend.
///
/// Returns the number of files scanned.
pub fn optimize_directory(
    dir: &Path,
    config: &OptimizeConfig,
    events: Option<Sender<OptimizeEvent>>,
) -> Result<usize, OptimizeError> {
    optimize_directory_with_backend(&RustBackend::new(), dir, config, events)
}

/// Optimize every WebP in `dir` using a specific backend (allows testing with mock).
pub fn optimize_directory_with_backend(
    backend: &impl ImageBackend,
    dir: &Path,
    config: &OptimizeConfig,
    events: Option<Sender<OptimizeEvent>>,
) -> Result<usize, OptimizeError> {
    let emit = |event: OptimizeEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    emit(OptimizeEvent::Started);
    let files = files_with_extension(dir, "webp")?;
    let downscale = DownscaleConfig::from(config);

    for path in &files {
        let file = display_name(path);
        match optimize_file(backend, path, path, &downscale) {
            Ok(outcome) => emit(OptimizeEvent::File { file, outcome }),
            Err(e) => emit(OptimizeEvent::Failed {
                file,
                error: e.to_string(),
            }),
        }
    }

    emit(OptimizeEvent::Finished);
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{ColorMode, ImageInfo};
    use crate::test_helpers::{TempDir, write_webp};
    use image::GenericImageView;
    use std::fs;
    use std::sync::mpsc;

    const MB: usize = 1024 * 1024;

    fn info(width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            width,
            height,
            mode: ColorMode::Rgb,
        }
    }

    #[test]
    fn small_file_is_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("small.webp");
        let content = vec![7u8; MB / 4];
        fs::write(&path, &content).unwrap();
        let backend = MockBackend::new();

        let outcome =
            optimize_file(&backend, &path, &path, &DownscaleConfig::from(&OptimizeConfig::default()))
                .unwrap();

        assert!(matches!(outcome, OptimizeOutcome::AlreadySmall { .. }));
        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read(&path).unwrap(), content);
    }

    #[test]
    fn large_file_follows_scale_law() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("img.webp");
        fs::write(&path, vec![0u8; MB / 2]).unwrap();
        let backend = MockBackend::with_info(vec![info(1000, 800)]).with_output_len(1024);

        let outcome =
            optimize_file(&backend, &path, &path, &DownscaleConfig::from(&OptimizeConfig::default()))
                .unwrap();

        assert_eq!(
            outcome,
            OptimizeOutcome::Resized {
                before_mb: 0.5,
                after_mb: 1024.0 / MB as f64,
                from: (1000, 800),
                to: (774, 619),
            }
        );
        let ops = backend.get_operations();
        assert!(matches!(
            &ops[1],
            RecordedOp::Resize {
                width: 774,
                height: 619,
                quality: 85,
                ..
            }
        ));
    }

    #[test]
    fn separate_output_leaves_input_alone() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in.webp");
        let output = tmp.path().join("out.webp");
        fs::write(&input, vec![1u8; MB]).unwrap();
        let backend = MockBackend::with_info(vec![info(400, 400)]).with_output_len(10);

        optimize_file(&backend, &input, &output, &DownscaleConfig::from(&OptimizeConfig::default()))
            .unwrap();

        assert_eq!(fs::metadata(&input).unwrap().len(), MB as u64);
        assert_eq!(fs::metadata(&output).unwrap().len(), 10);
    }

    #[test]
    fn directory_failure_does_not_stop_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.webp"), vec![0u8; MB]).unwrap();
        fs::write(tmp.path().join("b.webp"), vec![0u8; MB]).unwrap();
        fs::write(tmp.path().join("c.webp"), vec![0u8; 10]).unwrap();
        // identify pops from the back: b fails before popping, so a gets the only entry
        let backend = MockBackend::with_info(vec![info(100, 100)]).failing_on(&["b.webp"]);
        let (tx, rx) = mpsc::channel();

        let scanned =
            optimize_directory_with_backend(&backend, tmp.path(), &OptimizeConfig::default(), Some(tx))
                .unwrap();
        assert_eq!(scanned, 3);

        let events: Vec<OptimizeEvent> = rx.try_iter().collect();
        assert_eq!(events.first(), Some(&OptimizeEvent::Started));
        assert_eq!(events.last(), Some(&OptimizeEvent::Finished));
        assert!(events.iter().any(|e| matches!(
            e,
            OptimizeEvent::File { file, outcome: OptimizeOutcome::Resized { .. } } if file == "a.webp"
        )));
        assert!(events.iter().any(
            |e| matches!(e, OptimizeEvent::Failed { file, .. } if file == "b.webp")
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            OptimizeEvent::File { file, outcome: OptimizeOutcome::AlreadySmall { .. } } if file == "c.webp"
        )));
    }

    #[test]
    fn real_webp_is_downscaled_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.webp");
        let bytes = write_webp(&path, 600, 400);
        // Budget at a quarter of the current size halves each dimension.
        let config = OptimizeConfig {
            max_size_mb: bytes_to_mb(bytes) / 4.0,
            quality: 85,
        };

        optimize_directory(tmp.path(), &config, None).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.dimensions(), (300, 200));
    }
}
