//! `[site]` section configuration.
//!
//! Site metadata exposed to page templates and the feed template as `site`.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! author = "Jane Doe"
//! url = "https://example.com"
//! description = "Notes and essays"
//! language = "en"
//! ```

use serde::{Deserialize, Serialize};

/// Site metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Site title, used in page titles and the feed `<title>`.
    pub title: String,
    /// Author name for the feed.
    pub author: String,
    /// Absolute base URL without trailing slash.
    pub url: String,
    /// Short description for the home page and feed subtitle.
    pub description: String,
    /// Content language (`html lang`, feed `xml:lang`).
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            author: String::new(),
            url: "http://localhost:5277".to_string(),
            description: String::new(),
            language: "en".to_string(),
        }
    }
}

impl SiteInfo {
    /// Strip a trailing slash from the base URL.
    pub(in crate::config) fn normalize(&mut self) {
        let trimmed = self.url.trim_end_matches('/').len();
        self.url.truncate(trimmed);
    }
}
