//! Post metadata (`meta.json`) parsing.
//!
//! Metadata is read leniently: any valid JSON document is accepted and each
//! field is extracted on its own. A field that is missing or has an unusable
//! value is absent, it never fails the whole post.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Name of the metadata file inside a post directory.
pub const META_FILE: &str = "meta.json";

/// Name of the rendered body file inside a post directory.
pub const BODY_FILE: &str = "index.html";

/// Reader level of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Parse the exact spelling used in metadata files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Beginner" => Some(Self::Beginner),
            "Intermediate" => Some(Self::Intermediate),
            "Advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Metadata of a single post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMeta {
    /// Post title.
    pub title: Option<String>,

    /// Whether the post is listed in the sitemap.
    pub published: bool,

    /// Featured posts are listed first with a priority bonus.
    pub featured: bool,

    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,

    /// Reader level.
    pub difficulty: Option<Difficulty>,
}

impl PostMeta {
    /// Parse metadata from the contents of a `meta.json` file.
    pub fn from_json(content: &str, path: &Path) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| CoreError::meta(path, e.to_string()))?;
        Ok(Self::from_value(&value))
    }

    /// Read and parse a `meta.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, path)
    }

    /// Extract metadata fields from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name);

        Self {
            title: field("title").and_then(Value::as_str).map(str::to_string),
            published: field("published").is_some_and(is_truthy),
            featured: field("featured").is_some_and(is_truthy),
            created_at: field("createdAt").and_then(parse_timestamp),
            updated_at: field("updatedAt").and_then(parse_timestamp),
            difficulty: field("difficulty")
                .and_then(Value::as_str)
                .and_then(Difficulty::from_name),
        }
    }

    /// Date used as `<lastmod>`: the update date, else the creation date.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

/// JSON truthiness as metadata authors expect it (`"yes"` and `1` count, `""` and `0` don't).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse a timestamp field: a date string or epoch milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Parse the date spellings found in metadata files. Zone-less values are read as UTC.
pub fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
