/*!
 * Utility functions for treedump
 */

use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::Scanner;
use crate::types::EntryKind;

/// Count total files for progress tracking.
///
/// Runs a metadata-only pass with the same pruning rules as the real
/// traversal, so the progress bar length matches what will be processed.
pub fn count_files(config: &Config) -> Result<u64> {
    let mut probe = config.clone();
    probe.summary = true;

    let scanner = Scanner::new(probe, Arc::new(ProgressBar::hidden()));
    let count = scanner
        .entries()?
        .filter(|e| e.kind == Some(EntryKind::File))
        .count();

    Ok(count as u64)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Normalize a root-relative path to forward-slash segments.
pub fn normalize_rel(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Depth of a normalized relative path: its segment count.
///
/// The root itself normalizes to the empty string and has depth 0; an
/// immediate child has depth 1.
pub fn depth_of(rel: &str) -> usize {
    if rel.is_empty() {
        0
    } else {
        rel.split('/').count()
    }
}
