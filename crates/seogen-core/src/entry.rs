//! Scanned content entries.

use std::path::PathBuf;

use crate::meta::PostMeta;

/// A category directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Directory name.
    pub name: String,

    /// `/`-joined path relative to the content root.
    pub path: String,
}

/// A post directory holding metadata and a rendered body.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// `/`-joined path relative to the content root.
    pub path: String,

    /// Parsed `meta.json`.
    pub meta: PostMeta,

    /// Directory on disk.
    pub content_dir: PathBuf,
}

impl Post {
    /// Top-level board segment the post is grouped under.
    pub fn board(&self) -> &str {
        self.path.split('/').next().unwrap_or_default()
    }

    /// Whether the post is published.
    pub fn is_published(&self) -> bool {
        self.meta.published
    }

    /// Whether the post is featured.
    pub fn is_featured(&self) -> bool {
        self.meta.featured
    }
}

/// One qualifying directory of the content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Board(Board),
    Post(Post),
}

impl Entry {
    /// Relative path of the directory.
    pub fn path(&self) -> &str {
        match self {
            Self::Board(board) => &board.path,
            Self::Post(post) => &post.path,
        }
    }

    pub fn as_board(&self) -> Option<&Board> {
        match self {
            Self::Board(board) => Some(board),
            Self::Post(_) => None,
        }
    }

    pub fn as_post(&self) -> Option<&Post> {
        match self {
            Self::Post(post) => Some(post),
            Self::Board(_) => None,
        }
    }
}

/// Distinct board names in first-seen order.
pub fn board_names(entries: &[Entry]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for board in entries.iter().filter_map(Entry::as_board) {
        if !names.contains(&board.name.as_str()) {
            names.push(&board.name);
        }
    }
    names
}

/// Published posts in scan order.
pub fn published_posts(entries: &[Entry]) -> impl Iterator<Item = &Post> {
    entries
        .iter()
        .filter_map(Entry::as_post)
        .filter(|post| post.is_published())
}
