//! Directory scanning.
//!
//! Every tool works on the files sitting directly in one directory, selected
//! by extension the way a shell glob like `*.png` would: non-recursive,
//! case-sensitive, dot-files skipped. Results are sorted so runs are
//! deterministic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List regular files directly inside `dir` whose extension is exactly `ext`.
pub fn files_with_extension(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && !is_hidden(p)
                && p.extension().and_then(|e| e.to_str()) == Some(ext)
        })
        .collect();

    files.sort();
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// File name for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Size of a file in bytes.
pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}
