//! End-to-end run of the asset pipeline on a scratch site directory:
//! convert, convert-transparent, optimize, then rewrite-refs.

use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use webp_assets::config::{self, OptimizeConfig, PipelineConfig};
use webp_assets::convert::convert_directory;
use webp_assets::optimize::optimize_directory;
use webp_assets::rewrite::rewrite_directory;
use webp_assets::transparent::convert_transparent;

fn write_photo(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
    });
    img.save(path).unwrap();
}

fn write_logo(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([20, 40, 200, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    img.save(path).unwrap();
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_photo(&tmp.path().join("hero.png"), 320, 240);
    write_logo(&tmp.path().join("CALL ME.png"), 64, 64);
    fs::write(
        tmp.path().join("index.html"),
        r#"<img src="webp/hero.png"><img src='CALL ME.png'><img src="gone.png">"#,
    )
    .unwrap();
    tmp
}

#[test]
fn full_pipeline_rewrites_only_converted_references() {
    let tmp = site();
    let dir = tmp.path();
    let pipeline = PipelineConfig::default();

    let report = convert_directory(dir, &pipeline.convert, None)
        .unwrap()
        .unwrap();
    // Both PNGs are picked up by the batch converter.
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 2);
    assert!(dir.join("webp/hero.webp").is_file());
    assert!(dir.join("webp/CALL ME.webp").is_file());

    let transparent = convert_transparent(dir, &pipeline.transparent).unwrap();
    assert!(transparent.transparency());
    assert_eq!(transparent.output, dir.join("CALL ME.webp"));

    let rewrite = rewrite_directory(dir, &pipeline.rewrite, None)
        .unwrap()
        .unwrap();
    assert_eq!(rewrite.discovered, 1);
    assert_eq!(rewrite.updated, 1);

    let html = fs::read_to_string(dir.join("index.html")).unwrap();
    assert_eq!(
        html,
        r#"<img src="webp/hero.webp"><img src='CALL ME.webp'><img src="gone.png">"#
    );
    let backup = fs::read_to_string(dir.join("index.html.backup")).unwrap();
    assert!(backup.contains(r#"src="webp/hero.png""#));
}

#[test]
fn optimize_shrinks_converted_output_below_original_dimensions() {
    let tmp = site();
    let dir = tmp.path();
    let pipeline = PipelineConfig::default();
    convert_directory(dir, &pipeline.convert, None).unwrap();

    let hero = dir.join("webp/hero.webp");
    let before = fs::metadata(&hero).unwrap().len();
    let budget = OptimizeConfig {
        max_size_mb: before as f64 / (1024.0 * 1024.0) / 4.0,
        quality: 85,
    };

    let scanned = optimize_directory(&dir.join("webp"), &budget, None).unwrap();
    assert_eq!(scanned, 2);

    let decoded = image::open(&hero).unwrap();
    assert_eq!(decoded.dimensions(), (160, 120));
}

#[test]
fn config_file_overrides_output_dir() {
    let tmp = site();
    let dir = tmp.path();
    fs::write(
        dir.join(config::CONFIG_FILE_NAME),
        "[convert]\noutput_dir = \"assets\"\n",
    )
    .unwrap();

    let pipeline = config::load_config(dir).unwrap();
    assert_eq!(pipeline.convert.quality, 85);
    convert_directory(dir, &pipeline.convert, None).unwrap();

    assert!(dir.join("assets/hero.webp").is_file());
    assert!(!dir.join("webp").exists());
}

#[test]
fn empty_directory_is_reported_not_failed() {
    let tmp = TempDir::new().unwrap();
    let pipeline = PipelineConfig::default();

    assert!(
        convert_directory(tmp.path(), &pipeline.convert, None)
            .unwrap()
            .is_none()
    );
    assert!(
        rewrite_directory(tmp.path(), &pipeline.rewrite, None)
            .unwrap()
            .is_none()
    );
    assert_eq!(
        optimize_directory(tmp.path(), &pipeline.optimize, None).unwrap(),
        0
    );
    assert!(!tmp.path().join("webp").exists());
}
