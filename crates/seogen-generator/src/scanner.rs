//! Content scanning.
//!
//! Walks the content directory depth-first and classifies every directory as
//! a board or a post. A post directory holds both `meta.json` and
//! `index.html` and is never descended into; every other directory is a
//! board whose children are scanned after it.

use std::path::{Path, PathBuf};

use seogen_core::{
    Board, Entry, Post, PostMeta,
    meta::{BODY_FILE, META_FILE},
};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Content scanner rooted at the boards directory.
#[derive(Debug, Clone)]
pub struct ContentScanner {
    content_dir: PathBuf,
}

impl ContentScanner {
    /// Create a new scanner.
    #[must_use]
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Root of the scan.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Scan the content tree.
    ///
    /// Never fails: unreadable directories and broken metadata are logged and
    /// skipped, a missing root yields no entries.
    pub fn scan(&self) -> Vec<Entry> {
        info!(dir = %self.content_dir.display(), "scanning content");

        let mut entries = Vec::new();
        if !self.content_dir.is_dir() {
            warn!(dir = %self.content_dir.display(), "content directory does not exist");
            return entries;
        }

        let mut walker = WalkDir::new(&self.content_dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored(e));

        while let Some(result) = walker.next() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string());
                    warn!(path = ?path, error = %e, "failed to scan directory");
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            let relative = self.relative_path(dir);
            let meta_path = dir.join(META_FILE);

            if meta_path.is_file() && dir.join(BODY_FILE).is_file() {
                walker.skip_current_dir();

                match PostMeta::load(&meta_path) {
                    Ok(meta) => {
                        debug!(path = %relative, published = meta.published, "found post");
                        entries.push(Entry::Post(Post {
                            path: relative,
                            meta,
                            content_dir: dir.to_path_buf(),
                        }));
                    }
                    Err(e) => {
                        warn!(path = %meta_path.display(), error = %e, "failed to parse metadata, skipping directory");
                    }
                }
            } else {
                debug!(path = %relative, "found board");
                entries.push(Entry::Board(Board {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: relative,
                }));
            }
        }

        info!(count = entries.len(), "scan complete");
        entries
    }

    /// `/`-joined path of a directory relative to the content root.
    fn relative_path(&self, dir: &Path) -> String {
        let relative = dir.strip_prefix(&self.content_dir).unwrap_or(dir);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Names starting with `_` or `.` are private to the repository.
fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('_') || name.starts_with('.')
}
