//! Generator configuration management.
//!
//! Every section has defaults, so a missing `seogen.toml` is a valid setup:
//! content in `boards/`, output next to it, robots and watch rules as the
//! contents repository expects them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for seogen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Change watcher settings.
    #[serde(default)]
    pub watch: WatchConfig,

    /// Redirect script settings.
    #[serde(default)]
    pub redirect: RedirectConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name, used in the robots.txt header.
    #[serde(default = "default_title")]
    pub title: String,

    /// Published URL of the contents repository (e.g., "https://example.github.io/contents").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL segment under which boards are served.
    #[serde(default = "default_boards_path")]
    pub boards_path: String,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the board/post tree.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory receiving sitemap.xml and robots.txt.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Board configuration file, watched for changes.
    #[serde(default = "default_board_config")]
    pub board_config: PathBuf,
}

/// robots.txt configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Value of the `Crawl-delay` directive, in seconds.
    #[serde(default = "default_crawl_delay")]
    pub crawl_delay: u32,

    /// Paths emitted as `Disallow` rules.
    #[serde(default = "default_disallow")]
    pub disallow: Vec<String>,
}

/// Change watcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period before regenerating, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// File extensions under the content tree that trigger regeneration.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Redirect script configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Path prefix of board pages on the contents site.
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    /// Main blog URL visitors are sent to.
    #[serde(default = "default_target_url")]
    pub target_url: String,
}

// Default value functions
fn default_title() -> String {
    "Contents".to_string()
}

fn default_base_url() -> String {
    "https://example.github.io/contents".to_string()
}

fn default_boards_path() -> String {
    "boards".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("boards")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_board_config() -> PathBuf {
    PathBuf::from("boards-config.json")
}

fn default_crawl_delay() -> u32 {
    1
}

fn default_disallow() -> Vec<String> {
    vec![
        "/redirect.js".to_string(),
        "/templates/".to_string(),
        "/_config.json".to_string(),
        "/*/_config.json".to_string(),
    ]
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_extensions() -> Vec<String> {
    vec!["json".to_string(), "md".to_string(), "html".to_string()]
}

fn default_source_prefix() -> String {
    "/contents/boards".to_string()
}

fn default_target_url() -> String {
    "https://example.github.io/blog".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            base_url: default_base_url(),
            boards_path: default_boards_path(),
            author: None,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            board_config: default_board_config(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            crawl_delay: default_crawl_delay(),
            disallow: default_disallow(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            extensions: default_extensions(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            source_prefix: default_source_prefix(),
            target_url: default_target_url(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, ignoring the environment.
    ///
    /// Unlike [`Config::load_with_env`] the file must exist. Meant for
    /// embedding callers that need the result to depend on the file alone.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `SEOGEN__SECTION__KEY` environment overrides.
    ///
    /// The file is optional: without it only defaults and environment apply.
    /// List values are comma separated, e.g. `SEOGEN__WATCH__EXTENSIONS=json,md`.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_with(path, env_overrides())
    }

    fn load_with(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if !(self.site.base_url.starts_with("http://") || self.site.base_url.starts_with("https://"))
        {
            return Err(CoreError::config(
                "site.base_url must start with http:// or https://",
            ));
        }

        if self.site.boards_path.trim_matches('/').is_empty() {
            return Err(CoreError::config("site.boards_path cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        if self.watch.debounce_ms == 0 {
            return Err(CoreError::config("watch.debounce_ms must be positive"));
        }

        if self.watch.extensions.is_empty() {
            return Err(CoreError::config(
                "watch.extensions must list at least one extension",
            ));
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url())
    }

    /// Site-relative route of the boards index, e.g. `/boards/`.
    pub fn boards_route(&self) -> String {
        format!("/{}/", self.site.boards_path.trim_matches('/'))
    }

    /// Site-relative route of a board or post directory, e.g. `/boards/rust/intro/`.
    pub fn board_route(&self, relative: &str) -> String {
        let relative = relative.trim_matches('/');
        if relative.is_empty() {
            self.boards_route()
        } else {
            format!("{}{relative}/", self.boards_route())
        }
    }

    /// Absolute URL of a board or post directory.
    pub fn board_url(&self, relative: &str) -> String {
        self.url_for(&self.board_route(relative))
    }

    /// Published URL of the generated sitemap.
    pub fn sitemap_url(&self) -> String {
        self.url_for("sitemap.xml")
    }
}

/// `SEOGEN__SECTION__KEY` environment source.
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix("SEOGEN")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("watch.extensions")
        .with_list_parse_key("robots.disallow")
}
