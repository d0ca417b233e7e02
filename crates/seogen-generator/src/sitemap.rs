//! Sitemap generation.
//!
//! Generates the XML sitemap of the contents repository: the root page, the
//! boards index, every board, then published posts with featured posts first.

use chrono::{DateTime, Months, Utc};
use seogen_core::{Config, Difficulty, Entry, Post, PostMeta, board_names, published_posts};
use tracing::debug;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    /// URL location.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f64,

    /// Comment written above the entry.
    pub comment: Option<String>,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate sitemap XML from scanned entries.
    pub fn generate(&self, entries: &[Entry]) -> String {
        self.generate_at(entries, Utc::now())
    }

    /// Generate sitemap XML with an explicit clock.
    pub fn generate_at(&self, entries: &[Entry], now: DateTime<Utc>) -> String {
        let urls = self.collect_urls(entries, now);
        debug!(count = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in &urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// All sitemap entries in output order.
    pub fn collect_urls(&self, entries: &[Entry], now: DateTime<Utc>) -> Vec<SitemapUrl> {
        let posts: Vec<&Post> = published_posts(entries).collect();
        let mut urls = Vec::with_capacity(posts.len() + 2);

        urls.push(SitemapUrl {
            loc: self.config.url_for("/"),
            lastmod: Some(now),
            changefreq: ChangeFreq::Daily,
            priority: 1.0,
            comment: Some("Main page".to_string()),
        });

        urls.push(SitemapUrl {
            loc: self.config.url_for(&self.config.boards_route()),
            lastmod: Some(now),
            changefreq: ChangeFreq::Weekly,
            priority: 0.8,
            comment: Some("Boards".to_string()),
        });

        for name in board_names(entries) {
            // Posts are grouped by their top-level segment only.
            let lastmod = posts
                .iter()
                .filter(|post| post.board() == name)
                .filter_map(|post| post.meta.updated_at)
                .max()
                .unwrap_or(now);

            urls.push(SitemapUrl {
                loc: self.config.board_url(name),
                lastmod: Some(lastmod),
                changefreq: ChangeFreq::Weekly,
                priority: 0.8,
                comment: None,
            });
        }

        let (featured, regular): (Vec<&Post>, Vec<&Post>) =
            posts.into_iter().partition(|post| post.is_featured());

        for post in featured {
            let mut url = self.post_to_url(post, now);
            let title = post.meta.title.as_deref().unwrap_or(&post.path);
            url.comment = Some(format!("Featured: {title}"));
            urls.push(url);
        }

        for post in regular {
            urls.push(self.post_to_url(post, now));
        }

        urls
    }

    /// Convert a post to a sitemap URL entry.
    fn post_to_url(&self, post: &Post, now: DateTime<Utc>) -> SitemapUrl {
        SitemapUrl {
            loc: self.config.board_url(&post.path),
            lastmod: post.meta.last_modified(),
            changefreq: change_freq(&post.meta, now),
            priority: post_priority(&post.meta, now),
            comment: None,
        }
    }
}

/// Priority of a post: 0.6 base, bonuses for featured, recent and difficulty, capped at 1.0.
pub fn post_priority(meta: &PostMeta, now: DateTime<Utc>) -> f64 {
    let mut priority = 0.6;

    if meta.featured {
        priority += 0.2;
    }

    if let Some(created) = meta.created_at
        && now
            .checked_sub_months(Months::new(3))
            .is_some_and(|cutoff| created > cutoff)
    {
        priority += 0.1;
    }

    match meta.difficulty {
        Some(Difficulty::Beginner) => priority += 0.05,
        Some(Difficulty::Advanced) => priority += 0.1,
        Some(Difficulty::Intermediate) | None => {}
    }

    f64::min(priority, 1.0)
}

/// Change frequency from the age of the post's creation date.
pub fn change_freq(meta: &PostMeta, now: DateTime<Utc>) -> ChangeFreq {
    let Some(created) = meta.created_at else {
        return ChangeFreq::Monthly;
    };

    let days = (now - created).num_milliseconds() as f64 / 86_400_000.0;
    if days < 7.0 {
        ChangeFreq::Daily
    } else if days < 30.0 {
        ChangeFreq::Weekly
    } else {
        ChangeFreq::Monthly
    }
}

/// Priority as written to the sitemap, with one decimal digit.
pub fn format_priority(priority: f64) -> String {
    format!("{priority:.1}")
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::new();

    if let Some(comment) = &url.comment {
        xml.push_str(&format!("  <!-- {} -->\n", escape_comment(comment)));
    }

    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));

    if let Some(lastmod) = &url.lastmod {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%d")
        ));
    }

    xml.push_str(&format!(
        "    <changefreq>{}</changefreq>\n",
        url.changefreq.as_str()
    ));
    xml.push_str(&format!(
        "    <priority>{}</priority>\n",
        format_priority(url.priority)
    ));

    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// XML comments may not contain `--` or end with `-`.
fn escape_comment(s: &str) -> String {
    let mut text = s.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    if text.ends_with('-') {
        text.push(' ');
    }
    text
}
