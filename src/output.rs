//! CLI output formatting for all four tools.
//!
//! Every line a tool prints comes from here. Each tool has `format_*`
//! functions (returning `Vec<String>`) for testability and `print_*` wrappers
//! that write to stdout. Format functions are pure and do no I/O.
//!
//! # Output Format
//!
//! ## Convert
//!
//! ```text
//! PNG → WebP batch conversion
//! ==================================================
//! Found 2 PNG files
//! Created directory: webp
//!
//! ✓ hero.png → hero.webp
//!     Original: 812.4KB
//!     Compressed: 96.1KB
//!     Ratio: 88.2%
//! ✗ broken.png: Failed to decode broken.png: ...
//! ==================================================
//! Converted 1/2 files
//! Total original: 0.79MB
//! Total compressed: 0.09MB
//! Overall ratio: 88.2%
//! ✗ Failed: 1
//! ```
//!
//! ## Optimize
//!
//! ```text
//! Optimizing WebP images...
//! ✓ small.webp already small enough (0.12MB)
//! ✓ hero.webp: 0.52MB → 0.27MB (1600x900 → 1215x683)
//! Optimization complete
//! ```
//!
//! ## Rewrite
//!
//! ```text
//! HTML reference rewrite
//! ==================================================
//! Found 1 HTML files
//!
//! ⚠ index.html: WebP not found: img/b.webp
//! ✓ Updated index.html (1 rewritten, 1 kept)
//! ==================================================
//! Updated 1/1 files
//! Originals saved with the .backup suffix
//! ```

use crate::convert::{ConvertError, ConvertEvent};
use crate::optimize::{OptimizeEvent, OptimizeOutcome};
use crate::rewrite::{RewriteEvent, RewriteReport};
use crate::transparent::TransparentConversion;
use crate::types::{ConversionReport, FileStats};

const RULE_WIDTH: usize = 50;

// ============================================================================
// Shared helpers
// ============================================================================

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Title line followed by a rule.
pub fn format_banner(title: &str) -> Vec<String> {
    vec![title.to_string(), rule()]
}

fn kb(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}

fn mb(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / (1024.0 * 1024.0))
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(r) => format!("{r:.1}%"),
        None => "n/a".to_string(),
    }
}

/// Indented size and ratio lines for one converted file.
fn stats_lines(stats: &FileStats) -> Vec<String> {
    vec![
        format!("    Original: {}", kb(stats.original_bytes)),
        format!("    Compressed: {}", kb(stats.output_bytes)),
        format!("    Ratio: {}", ratio(stats.ratio())),
    ]
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

/// Print a run-level failure that prevented a tool from doing any work.
pub fn print_tool_error(tool: &str, error: &dyn std::fmt::Display) {
    println!("✗ {tool}: {error}");
}

// ============================================================================
// Batch conversion
// ============================================================================

/// Format a single batch conversion event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::Discovered { count } => {
            vec![format!("Found {count} PNG files"), String::new()]
        }
        ConvertEvent::OutputDirCreated { path } => {
            vec![format!("Created directory: {path}")]
        }
        ConvertEvent::Converted {
            source,
            output,
            stats,
        } => {
            let mut lines = vec![format!("✓ {source} → {output}")];
            lines.extend(stats_lines(stats));
            lines
        }
        ConvertEvent::Failed { source, error } => vec![format!("✗ {source}: {error}")],
    }
}

/// Format the end-of-run summary, or the "nothing found" notice.
pub fn format_conversion_report(report: Option<&ConversionReport>) -> Vec<String> {
    let Some(report) = report else {
        return vec!["✗ No PNG files found in this directory".to_string()];
    };
    let mut lines = vec![
        rule(),
        format!("Converted {}/{} files", report.succeeded, report.attempted),
        format!("Total original: {}", mb(report.original_bytes)),
        format!("Total compressed: {}", mb(report.output_bytes)),
        format!("Overall ratio: {}", ratio(report.overall_ratio())),
    ];
    if report.failed() > 0 {
        lines.push(format!("✗ Failed: {}", report.failed()));
    }
    lines
}

pub fn print_convert_event(event: &ConvertEvent) {
    print_lines(format_convert_event(event));
}

pub fn print_conversion_report(report: Option<&ConversionReport>) {
    print_lines(format_conversion_report(report));
}

// ============================================================================
// Transparent conversion
// ============================================================================

/// Format the result of a single transparent conversion.
pub fn format_transparent_result(
    result: &Result<TransparentConversion, ConvertError>,
) -> Vec<String> {
    match result {
        Ok(conversion) => {
            let source = crate::scan::display_name(&conversion.source);
            let output = crate::scan::display_name(&conversion.output);
            let mode = conversion.mode;
            let mut lines = if conversion.transparency() {
                vec![format!("✓ Transparency detected: {source} ({mode})")]
            } else {
                vec![format!("⚠ No transparency: {source} ({mode}, written as RGB)")]
            };
            lines.extend(stats_lines(&conversion.stats));
            lines.push(rule());
            lines.push(format!("✓ {source} → {output}"));
            if conversion.transparency() {
                lines.push("Transparent background preserved".to_string());
            }
            lines
        }
        Err(ConvertError::NotFound(path)) => {
            vec![format!("✗ File not found: {}", path.display())]
        }
        Err(e) => vec![format!("✗ Conversion failed: {e}")],
    }
}

pub fn print_transparent_result(result: &Result<TransparentConversion, ConvertError>) {
    print_lines(format_transparent_result(result));
}

// ============================================================================
// Optimize
// ============================================================================

/// Format a single optimizer event as display lines.
pub fn format_optimize_event(event: &OptimizeEvent) -> Vec<String> {
    match event {
        OptimizeEvent::Started => vec!["Optimizing WebP images...".to_string()],
        OptimizeEvent::File { file, outcome } => match outcome {
            OptimizeOutcome::AlreadySmall { size_mb } => {
                vec![format!("✓ {file} already small enough ({size_mb:.2}MB)")]
            }
            OptimizeOutcome::Resized {
                before_mb,
                after_mb,
                from,
                to,
            } => vec![format!(
                "✓ {file}: {before_mb:.2}MB → {after_mb:.2}MB ({}x{} → {}x{})",
                from.0, from.1, to.0, to.1
            )],
        },
        OptimizeEvent::Failed { file, error } => vec![format!("✗ {file}: {error}")],
        OptimizeEvent::Finished => vec!["Optimization complete".to_string()],
    }
}

pub fn print_optimize_event(event: &OptimizeEvent) {
    print_lines(format_optimize_event(event));
}

// ============================================================================
// Rewrite
// ============================================================================

/// Format a single rewrite event as display lines.
pub fn format_rewrite_event(event: &RewriteEvent) -> Vec<String> {
    match event {
        RewriteEvent::Discovered { count } => {
            vec![format!("Found {count} HTML files"), String::new()]
        }
        RewriteEvent::MissingWebp { file, webp_path } => {
            vec![format!("⚠ {file}: WebP not found: {webp_path}")]
        }
        RewriteEvent::Updated {
            file,
            rewritten,
            kept,
        } => vec![format!(
            "✓ Updated {file} ({rewritten} rewritten, {kept} kept)"
        )],
        RewriteEvent::Failed { file, error } => vec![format!("✗ {file}: {error}")],
    }
}

/// Format the end-of-run summary, or the "nothing found" notice.
pub fn format_rewrite_report(report: Option<&RewriteReport>, backup_suffix: &str) -> Vec<String> {
    let Some(report) = report else {
        return vec!["✗ No HTML files found in this directory".to_string()];
    };
    vec![
        rule(),
        format!("Updated {}/{} files", report.updated, report.discovered),
        format!("Originals saved with the {backup_suffix} suffix"),
    ]
}

pub fn print_rewrite_event(event: &RewriteEvent) {
    print_lines(format_rewrite_event(event));
}

pub fn print_rewrite_report(report: Option<&RewriteReport>, backup_suffix: &str) {
    print_lines(format_rewrite_report(report, backup_suffix));
}

pub fn print_banner(title: &str) {
    print_lines(format_banner(title));
}
