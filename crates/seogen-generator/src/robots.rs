//! Robots.txt generation.
//!
//! Generates the robots.txt file for search engine crawlers.

use seogen_core::{Config, Entry, board_names};
use tracing::debug;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate robots.txt from scanned entries.
    pub fn generate(&self, entries: &[Entry]) -> String {
        let boards = board_names(entries);
        debug!(boards = boards.len(), "generating robots.txt");

        let mut out = String::new();

        out.push_str(&format!("# {} - Contents Repository\n", self.config.site.title));
        out.push_str(&format!("# {}/\n", self.config.base_url()));
        out.push('\n');

        out.push_str("User-agent: *\n");
        out.push_str("Allow: /\n");
        out.push('\n');

        out.push_str("# Board listings\n");
        out.push_str(&format!("Allow: {}\n", self.config.boards_route()));
        for name in boards {
            out.push_str(&format!("Allow: {}\n", self.config.board_route(name)));
        }

        if !self.config.robots.disallow.is_empty() {
            out.push('\n');
            out.push_str("# Redirect script, templates and configuration files\n");
            for path in &self.config.robots.disallow {
                out.push_str(&format!("Disallow: {path}\n"));
            }
        }

        out.push('\n');
        out.push_str(&format!("Sitemap: {}\n", self.config.sitemap_url()));
        out.push('\n');
        out.push_str(&format!("Crawl-delay: {}\n", self.config.robots.crawl_delay));

        out
    }
}
