//! Recursive, cancellable project-wide text search

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::sync::{mpsc, watch};

use pide_core::prelude::*;
use pide_core::{Position, Range, SearchMatch};

/// Directories never descended into during a search
const SKIP_DIRS: &[&str] = &["build", "node_modules", "target"];

/// Maximum directory depth to search
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// One project-wide search request. Immutable once submitted.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Text to look for (matched literally, case-sensitive)
    pub query: String,
    /// File extensions to include; empty means all files
    pub extensions: HashSet<String>,
    /// Source roots to scan
    pub roots: Vec<PathBuf>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, roots: Vec<PathBuf>) -> Self {
        Self {
            query: query.into(),
            extensions: HashSet::new(),
            roots,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|s| s.into().trim_start_matches('.').to_string())
            .collect();
        self
    }
}

/// Streamed search output. `Done` is sent exactly once per scan unless the
/// receiver is gone or the scan was cancelled.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// All matches found in one file
    Batch {
        path: PathBuf,
        matches: Vec<SearchMatch>,
    },
    /// The scan failed outright (bad pattern, unreadable roots)
    Failed { message: String },
    /// Scan finished; no more events follow
    Done,
}

/// Recursively search `request.roots` for the query, streaming per-file
/// batches over `tx`.
///
/// Cancellation: flips of `cancel` to `true` are observed between files;
/// after cancellation no further events are sent, not even `Done`. Unreadable
/// directories and non-UTF-8 files are skipped, not errors.
///
/// Runs blocking filesystem work on the spawn-blocking pool; callers get a
/// future that completes when the scan is over.
pub async fn search_recursive(
    request: SearchRequest,
    cancel: watch::Receiver<bool>,
    tx: mpsc::Sender<SearchEvent>,
) {
    let result = tokio::task::spawn_blocking(move || scan(&request, &cancel, &tx)).await;
    if let Err(err) = result {
        // Scan task panicked; the boundary converts it into a failed batch
        // upstream via channel closure, so only log here.
        error!("Search task failed: {err}");
    }
}

fn scan(request: &SearchRequest, cancel: &watch::Receiver<bool>, tx: &mpsc::Sender<SearchEvent>) {
    let pattern = match Regex::new(&regex::escape(&request.query)) {
        Ok(p) => p,
        Err(e) => {
            let _ = tx.blocking_send(SearchEvent::Failed {
                message: format!("Bad search pattern: {e}"),
            });
            return;
        }
    };

    for root in &request.roots {
        if *cancel.borrow() {
            return;
        }
        scan_dir(root, 0, request, &pattern, cancel, tx);
    }

    if !*cancel.borrow() {
        let _ = tx.blocking_send(SearchEvent::Done);
    }
}

fn scan_dir(
    dir: &Path,
    depth: usize,
    request: &SearchRequest,
    pattern: &Regex,
    cancel: &watch::Receiver<bool>,
    tx: &mpsc::Sender<SearchEvent>,
) {
    if depth > DEFAULT_MAX_DEPTH {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping unreadable directory {}: {e}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        if *cancel.borrow() {
            return;
        }

        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if name.starts_with('.') || SKIP_DIRS.contains(&name.as_ref()) {
                continue;
            }
            scan_dir(&path, depth + 1, request, pattern, cancel, tx);
        } else if wanted_extension(&path, &request.extensions) {
            let matches = scan_file(&path, pattern);
            if !matches.is_empty() {
                let _ = tx.blocking_send(SearchEvent::Batch { path, matches });
            }
        }
    }
}

fn wanted_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(e))
        .unwrap_or(false)
}

fn scan_file(path: &Path, pattern: &Regex) -> Vec<SearchMatch> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        // Binary or unreadable files are silently skipped
        Err(_) => return Vec::new(),
    };

    let mut matches = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        for hit in pattern.find_iter(line) {
            let start_col = line[..hit.start()].chars().count() as u32;
            let end_col = start_col + line[hit.start()..hit.end()].chars().count() as u32;
            matches.push(SearchMatch {
                path: path.to_path_buf(),
                range: Range::new(
                    Position::new(line_no as u32, start_col),
                    Position::new(line_no as u32, end_col),
                ),
                line_text: line.to_string(),
            });
        }
    }
    matches
}
