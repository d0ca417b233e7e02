//! Generation pipeline.
//!
//! Scans the content tree once and writes `sitemap.xml` and `robots.txt`
//! into the output directory. Both files are rewritten in full on every
//! run and nothing else is touched, so a run can be repeated at will.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, Utc};
use seogen_core::{Config, board_names, published_posts};
use thiserror::Error;
use tracing::{debug, info};

use crate::{robots::RobotsGenerator, scanner::ContentScanner, sitemap::SitemapGenerator};

/// File name of the generated sitemap.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// File name of the generated robots policy.
pub const ROBOTS_FILE: &str = "robots.txt";

/// Generation errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Generation statistics.
#[derive(Debug, Clone, Default)]
pub struct GenerationStats {
    /// Distinct board names, in scan order.
    pub board_names: Vec<String>,

    /// Number of published posts.
    pub published_posts: usize,

    /// Number of published posts that are featured.
    pub featured_posts: usize,

    /// Path of the written sitemap.
    pub sitemap_path: PathBuf,

    /// Path of the written robots.txt.
    pub robots_path: PathBuf,

    /// Generation duration in milliseconds.
    pub duration_ms: u64,
}

impl GenerationStats {
    /// Number of distinct boards.
    pub fn boards(&self) -> usize {
        self.board_names.len()
    }
}

/// Runs scanner and builders and writes the results.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
}

impl Generator {
    /// Create a new generator.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create a generator using the directories named in the configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let content_dir = config.paths.content_dir.clone();
        let output_dir = config.paths.output_dir.clone();
        Self::new(config, content_dir, output_dir)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute one generation cycle.
    pub fn run(&self) -> Result<GenerationStats> {
        self.run_at(Utc::now())
    }

    /// Execute one generation cycle with an explicit clock.
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<GenerationStats> {
        let start = Instant::now();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting generation"
        );

        let entries = ContentScanner::new(&self.content_dir).scan();

        let mut stats = GenerationStats {
            board_names: board_names(&entries)
                .into_iter()
                .map(str::to_string)
                .collect(),
            ..Default::default()
        };
        for post in published_posts(&entries) {
            stats.published_posts += 1;
            if post.is_featured() {
                stats.featured_posts += 1;
            }
        }

        let sitemap = SitemapGenerator::new(self.config.clone()).generate_at(&entries, now);
        stats.sitemap_path = self.output_dir.join(SITEMAP_FILE);
        write_output(&stats.sitemap_path, &sitemap)?;

        let robots = RobotsGenerator::new(self.config.clone()).generate(&entries);
        stats.robots_path = self.output_dir.join(ROBOTS_FILE);
        write_output(&stats.robots_path, &robots)?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            boards = stats.boards(),
            published_posts = stats.published_posts,
            featured_posts = stats.featured_posts,
            duration_ms = stats.duration_ms,
            "generation complete"
        );

        Ok(stats)
    }
}

/// Overwrite an output file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.site.base_url = "https://example.com/contents".to_string();
        config
    }

    fn write_post(root: &Path, rel: &str, meta: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("meta.json"), meta).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
    }

    #[test]
    fn test_generate_empty_content() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let generator = Generator::new(test_config(), content_dir.path(), output_dir.path());
        let stats = generator.run().unwrap();

        assert_eq!(stats.boards(), 0);
        assert_eq!(stats.published_posts, 0);
        assert!(output_dir.path().join(SITEMAP_FILE).exists());
        assert!(output_dir.path().join(ROBOTS_FILE).exists());
    }

    #[test]
    fn test_generate_counts() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_post(
            content_dir.path(),
            "frontend/hooks",
            r#"{"published": true, "featured": true}"#,
        );
        write_post(content_dir.path(), "frontend/css", r#"{"published": true}"#);
        write_post(content_dir.path(), "backend/draft", r#"{"published": false, "featured": true}"#);

        let generator = Generator::new(test_config(), content_dir.path(), output_dir.path());
        let stats = generator.run().unwrap();

        assert_eq!(stats.board_names, vec!["backend", "frontend"]);
        assert_eq!(stats.published_posts, 2);
        assert_eq!(stats.featured_posts, 1);
        assert_eq!(stats.sitemap_path, output_dir.path().join(SITEMAP_FILE));
    }

    #[test]
    fn test_outputs_are_overwritten() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let robots_path = output_dir.path().join(ROBOTS_FILE);
        fs::write(&robots_path, "stale content that is much longer than anything else\n".repeat(100))
            .unwrap();

        let generator = Generator::new(test_config(), content_dir.path(), output_dir.path());
        generator.run().unwrap();

        let robots = fs::read_to_string(&robots_path).unwrap();
        assert!(!robots.contains("stale"));
        assert!(robots.starts_with("# Contents - Contents Repository"));
    }

    #[test]
    fn test_missing_output_dir_is_an_error() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let missing = output_dir.path().join("does/not/exist");

        let generator = Generator::new(test_config(), content_dir.path(), &missing);
        let err = generator.run().unwrap_err();

        assert!(err.to_string().contains("sitemap.xml"));
        assert!(!missing.exists());
    }

    #[test]
    fn test_from_config_uses_configured_paths() {
        let mut config = test_config();
        config.paths.content_dir = PathBuf::from("content/boards");
        config.paths.output_dir = PathBuf::from("content");

        let generator = Generator::from_config(config);

        assert_eq!(generator.content_dir(), Path::new("content/boards"));
        assert_eq!(generator.output_dir(), Path::new("content"));
    }
}
