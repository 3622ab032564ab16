//! `[feed]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [feed]
//! template = "feed.xml"   # Relative to paths.templates
//! limit = 10              # Most recent posts included
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Atom feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed template file name inside the templates directory.
    pub template: PathBuf,
    /// Maximum number of entries in the feed.
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            template: "feed.xml".into(),
            limit: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_feed_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.feed.limit, 10);
        assert_eq!(config.feed.template.to_str(), Some("feed.xml"));
    }

    #[test]
    fn test_feed_limit() {
        let config = test_parse_config("[feed]\nlimit = 25");
        assert_eq!(config.feed.limit, 25);
    }
}
