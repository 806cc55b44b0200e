//! Pipeline configuration module.
//!
//! Handles loading, validating, and merging the optional `webp-assets.toml`
//! file in the working directory. Every setting has a default matching the
//! tools' historical constants, so running without a config file behaves
//! exactly like the zero-argument tools.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [convert]
//! quality = 85                   # Lossy WebP quality (0-100)
//! output_dir = "webp"            # Subdirectory receiving converted files
//! background = [255, 255, 255]   # Flattening colour for transparent PNGs
//!
//! [transparent]
//! input = "CALL ME.png"          # File converted with alpha preserved
//! # output = "CALL ME.webp"      # Defaults to input with a .webp extension
//! quality = 85
//!
//! [optimize]
//! max_size_mb = 0.3              # Files above this are downscaled
//! quality = 85
//!
//! [rewrite]
//! backup_suffix = ".backup"      # Appended to the HTML file name
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [optimize]
//! max_size_mb = 0.5
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "webp-assets.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for all four tools.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Batch PNG → WebP conversion.
    pub convert: ConvertConfig,
    /// Single-file, alpha-preserving conversion.
    pub transparent: TransparentConfig,
    /// Size-targeted re-compression of existing WebP files.
    pub optimize: OptimizeConfig,
    /// HTML `src` reference rewriting.
    pub rewrite: RewriteConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, quality) in [
            ("convert.quality", self.convert.quality),
            ("transparent.quality", self.transparent.quality),
            ("optimize.quality", self.optimize.quality),
        ] {
            if quality > 100 {
                return Err(ConfigError::Validation(format!("{key} must be 0-100")));
            }
        }
        if !self.optimize.max_size_mb.is_finite() || self.optimize.max_size_mb <= 0.0 {
            return Err(ConfigError::Validation(
                "optimize.max_size_mb must be a positive number".into(),
            ));
        }
        if self.convert.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "convert.output_dir must not be empty".into(),
            ));
        }
        if self.transparent.input.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "transparent.input must not be empty".into(),
            ));
        }
        if self.rewrite.backup_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "rewrite.backup_suffix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Batch conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Lossy WebP quality (0 = worst, 100 = best).
    pub quality: u32,
    /// Output subdirectory, relative to the working directory.
    pub output_dir: PathBuf,
    /// RGB colour transparent pixels are flattened onto.
    pub background: [u8; 3],
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            output_dir: PathBuf::from("webp"),
            background: [255, 255, 255],
        }
    }
}

/// Transparency-preserving conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransparentConfig {
    /// Source PNG, relative to the working directory.
    pub input: PathBuf,
    /// Destination; `None` means the input with a `.webp` extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub quality: u32,
}

impl TransparentConfig {
    /// Resolve the output path, deriving it from the input when unset.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("webp"))
    }
}

impl Default for TransparentConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("CALL ME.png"),
            output: None,
            quality: 85,
        }
    }
}

/// Re-optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Size budget in MB (1 MB = 1024² bytes). Larger files are downscaled.
    pub max_size_mb: f64,
    pub quality: u32,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 0.3,
            quality: 85,
        }
    }
}

/// Reference rewriter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Appended to the full HTML file name to form the backup path.
    pub backup_suffix: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            backup_suffix: ".backup".to_string(),
        }
    }
}

// =============================================================================
// Command-line overrides
// =============================================================================
//
// Flags sit on top of the file: `Some` replaces the loaded value, `None`
// keeps it. Re-run `validate` after applying.

impl ConvertConfig {
    pub fn apply_overrides(&mut self, quality: Option<u32>, output_dir: Option<PathBuf>) {
        if let Some(quality) = quality {
            self.quality = quality;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
    }
}

impl TransparentConfig {
    /// A new `input` without an explicit `output` drops any configured
    /// output, so the destination is derived from the new input.
    pub fn apply_overrides(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        quality: Option<u32>,
    ) {
        if let Some(input) = input {
            self.input = input;
            self.output = None;
        }
        if output.is_some() {
            self.output = output;
        }
        if let Some(quality) = quality {
            self.quality = quality;
        }
    }
}

impl OptimizeConfig {
    pub fn apply_overrides(&mut self, max_size_mb: Option<f64>, quality: Option<u32>) {
        if let Some(max_size_mb) = max_size_mb {
            self.max_size_mb = max_size_mb;
        }
        if let Some(quality) = quality {
            self.quality = quality;
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PipelineConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load the config file from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no config file exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the config file in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<PipelineConfig, ConfigError> {
    resolve_config(load_raw_config(dir)?)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# webp-assets configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as webp-assets.toml in the directory the tools run on.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Batch PNG -> WebP conversion (webp-assets convert)
# ---------------------------------------------------------------------------
[convert]
# Lossy WebP quality (0 = worst, 100 = best).
quality = 85

# Subdirectory that receives <name>.webp for every <name>.png.
output_dir = "webp"

# RGB colour that transparent pixels are flattened onto.
background = [255, 255, 255]

# ---------------------------------------------------------------------------
# Transparency-preserving conversion (webp-assets convert-transparent)
# ---------------------------------------------------------------------------
[transparent]
# Source PNG converted with its alpha channel kept.
input = "CALL ME.png"

# Destination. Defaults to the input with a .webp extension.
# output = "CALL ME.webp"

quality = 85

# ---------------------------------------------------------------------------
# Size-targeted re-compression (webp-assets optimize)
# ---------------------------------------------------------------------------
[optimize]
# WebP files larger than this many MB are downscaled toward it.
max_size_mb = 0.3

quality = 85

# ---------------------------------------------------------------------------
# HTML reference rewriting (webp-assets rewrite-refs)
# ---------------------------------------------------------------------------
[rewrite]
# Appended to the HTML file name for the pre-edit copy (index.html.backup).
backup_suffix = ".backup"
"##
}
