//! HTML `src` reference rewriting.
//!
//! Every `src="….png"` or `src='….png'` in the `*.html` files of the working
//! directory is pointed at the sibling `.webp`, but only when that file
//! already exists. Unresolvable references are left byte-for-byte intact and
//! reported as warnings, so one document can end up with a mix of rewritten
//! and original references.
//!
//! Before a document is written back, its unmodified content is copied to
//! `<name>.html<backup_suffix>`. The backup is written even when no reference
//! ends up changing.
//!
//! ## Matching
//!
//! The attribute name `src` is matched case-sensitively with no surrounding
//! context. The opening and closing quote must be the same character; since
//! the captured path may not contain either quote character, the two quote
//! styles are expressed as two alternatives instead of a back-reference.

use crate::config::RewriteConfig;
use crate::scan::{display_name, files_with_extension};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::mpsc::Sender;
use thiserror::Error;

static PNG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"src=(?:"([^"']*\.png)"|'([^"']*\.png)')"#).expect("static regex is valid")
});

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One `src` attribute pointing at a PNG, and what became of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEdit {
    /// The full matched attribute text, e.g. `src="img/a.png"`.
    pub original: String,
    pub quote: char,
    pub png_path: String,
    /// Candidate replacement path with the `.png` suffix swapped for `.webp`.
    pub webp_path: String,
    /// Whether the candidate existed and the attribute was rewritten.
    pub applied: bool,
}

/// A document after reference rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenDocument {
    pub content: String,
    pub edits: Vec<ReferenceEdit>,
}

impl RewrittenDocument {
    pub fn applied(&self) -> usize {
        self.edits.iter().filter(|e| e.applied).count()
    }

    /// Candidate WebP paths that did not exist.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.edits
            .iter()
            .filter(|e| !e.applied)
            .map(|e| e.webp_path.as_str())
    }
}

/// Progress events emitted while rewriting a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteEvent {
    /// HTML files found in the directory.
    Discovered { count: usize },
    /// A referenced WebP does not exist; the reference was kept.
    MissingWebp { file: String, webp_path: String },
    Updated {
        file: String,
        rewritten: usize,
        kept: usize,
    },
    Failed { file: String, error: String },
}

/// End-of-run tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub discovered: usize,
    pub updated: usize,
}

/// Swap a trailing `.png` for `.webp`.
pub fn webp_candidate(png_path: &str) -> String {
    match png_path.strip_suffix(".png") {
        Some(stem) => format!("{stem}.webp"),
        None => png_path.to_string(),
    }
}

/// Rewrite PNG references in `content`.
///
/// `webp_exists` is consulted once per match with the candidate path, at
/// substitution time.
pub fn rewrite_references(content: &str, webp_exists: impl Fn(&str) -> bool) -> RewrittenDocument {
    let mut edits = Vec::new();
    let rewritten = PNG_SRC.replace_all(content, |caps: &Captures| {
        let (quote, png_path) = match (caps.get(1), caps.get(2)) {
            (Some(m), _) => ('"', m.as_str()),
            (None, Some(m)) => ('\'', m.as_str()),
            (None, None) => unreachable!("one alternative always participates"),
        };
        let original = caps[0].to_string();
        let webp_path = webp_candidate(png_path);
        let applied = webp_exists(&webp_path);
        let replacement = if applied {
            format!("src={quote}{webp_path}{quote}")
        } else {
            original.clone()
        };
        edits.push(ReferenceEdit {
            original,
            quote,
            png_path: png_path.to_string(),
            webp_path,
            applied,
        });
        replacement
    });

    RewrittenDocument {
        content: rewritten.into_owned(),
        edits,
    }
}

/// Backup path: the suffix is appended to the full file name.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or(path.as_os_str()).to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Back up and rewrite one HTML file.
///
/// Candidate WebP paths are resolved against `base_dir`.
pub fn rewrite_file(
    path: &Path,
    base_dir: &Path,
    config: &RewriteConfig,
) -> Result<RewrittenDocument, RewriteError> {
    let content = fs::read_to_string(path)?;
    fs::write(backup_path(path, &config.backup_suffix), &content)?;

    let document = rewrite_references(&content, |candidate| base_dir.join(candidate).exists());
    fs::write(path, &document.content)?;
    Ok(document)
}

/// Rewrite every HTML file in `dir`.
///
/// Returns `Ok(None)` when the directory holds no HTML files.
pub fn rewrite_directory(
    dir: &Path,
    config: &RewriteConfig,
    events: Option<Sender<RewriteEvent>>,
) -> Result<Option<RewriteReport>, RewriteError> {
    let emit = |event: RewriteEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let files = files_with_extension(dir, "html")?;
    if files.is_empty() {
        return Ok(None);
    }
    emit(RewriteEvent::Discovered { count: files.len() });

    let mut report = RewriteReport {
        discovered: files.len(),
        updated: 0,
    };

    for path in &files {
        let file = display_name(path);
        match rewrite_file(path, dir, config) {
            Ok(document) => {
                for webp_path in document.missing() {
                    emit(RewriteEvent::MissingWebp {
                        file: file.clone(),
                        webp_path: webp_path.to_string(),
                    });
                }
                let rewritten = document.applied();
                emit(RewriteEvent::Updated {
                    file,
                    rewritten,
                    kept: document.edits.len() - rewritten,
                });
                report.updated += 1;
            }
            Err(e) => emit(RewriteEvent::Failed {
                file,
                error: e.to_string(),
            }),
        }
    }

    Ok(Some(report))
}
