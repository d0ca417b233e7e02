//! seogen Core Library
//!
//! Configuration, error handling, the scanned content model and the
//! crawler-aware redirect rules shared by the seogen crates.

pub mod config;
pub mod entry;
pub mod error;
pub mod meta;
pub mod redirect;

pub use config::Config;
pub use entry::{Board, Entry, Post, board_names, published_posts};
pub use error::{CoreError, Result};
pub use meta::{Difficulty, PostMeta};
pub use redirect::{RedirectDecision, Redirector};
