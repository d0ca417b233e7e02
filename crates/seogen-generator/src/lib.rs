//! seogen Generator Library
//!
//! Builds `sitemap.xml` and `robots.txt` for a folder-based contents tree.
//!
//! # Modules
//!
//! - [`scanner`] - Board/post discovery in the content directory
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - robots.txt generation
//! - [`build`] - Generation pipeline

pub mod build;
pub mod robots;
pub mod scanner;
pub mod sitemap;

pub use build::{GenerateError, GenerationStats, Generator};
pub use robots::RobotsGenerator;
pub use scanner::ContentScanner;
pub use sitemap::{ChangeFreq, SitemapGenerator};
