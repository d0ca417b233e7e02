//! Crawler-aware redirect rules.
//!
//! Board pages of the contents site exist for search engines. Human visitors
//! are sent to the same board or post on the main blog; crawlers stay.

use regex::Regex;

use crate::{config::RedirectConfig, error::Result};

/// User-agent fragments identifying search engines and link-preview crawlers.
const CRAWLER_PATTERNS: &[&str] = &[
    "googlebot",
    "bingbot",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "whatsapp",
    "telegrambot",
    "applebot",
    "bot",
    "crawler",
    "spider",
    "crawling",
];

/// Whether a user agent belongs to a crawler.
///
/// No user agent at all means the page is not running in a browser.
pub fn is_crawler(user_agent: Option<&str>) -> bool {
    let Some(user_agent) = user_agent else {
        return true;
    };
    let user_agent = user_agent.to_lowercase();
    CRAWLER_PATTERNS
        .iter()
        .any(|pattern| user_agent.contains(pattern))
}

/// Outcome for one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Crawler: leave it on the contents page.
    Stay,
    /// Visitor: replace the location with this URL.
    Redirect(String),
}

/// Maps contents-site paths to main blog URLs.
#[derive(Debug, Clone)]
pub struct Redirector {
    post_pattern: Regex,
    board_pattern: Regex,
    target_url: String,
}

impl Redirector {
    /// Compile the path decoders for the configured prefix.
    pub fn new(config: &RedirectConfig) -> Result<Self> {
        let prefix = regex::escape(config.source_prefix.trim_end_matches('/'));
        Ok(Self {
            post_pattern: Regex::new(&format!(r"^{prefix}/([^/]+)/([^/]+)/?$"))?,
            board_pattern: Regex::new(&format!(r"^{prefix}/([^/]+)/?$"))?,
            target_url: config.target_url.trim_end_matches('/').to_string(),
        })
    }

    /// Main blog URL for a contents-site path.
    pub fn target_for(&self, pathname: &str) -> String {
        if let Some(caps) = self.post_pattern.captures(pathname) {
            return format!("{}/boards/{}/{}/", self.target_url, &caps[1], &caps[2]);
        }
        if let Some(caps) = self.board_pattern.captures(pathname) {
            return format!("{}/boards/{}/", self.target_url, &caps[1]);
        }
        self.target_url.clone()
    }

    /// Decide what happens to a page view.
    pub fn resolve(&self, user_agent: Option<&str>, pathname: &str) -> RedirectDecision {
        if is_crawler(user_agent) {
            tracing::debug!(?user_agent, "crawler detected, staying on page");
            return RedirectDecision::Stay;
        }
        RedirectDecision::Redirect(self.target_for(pathname))
    }
}
