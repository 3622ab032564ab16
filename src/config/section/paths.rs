//! `[paths]` section configuration.
//!
//! All paths are relative to the directory containing the config file.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! posts = "posts"           # Markdown posts (flat directory)
//! extension = "md"          # Post file extension
//! templates = "templates"   # Page templates and the feed template
//! assets = "assets"         # Served under /assets/
//! robots = "robots.txt"     # Served at /robots.txt
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Content and template locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Posts directory.
    pub posts: PathBuf,
    /// Post file extension, without the leading dot.
    pub extension: String,
    /// Templates directory.
    pub templates: PathBuf,
    /// Static assets directory.
    pub assets: PathBuf,
    /// robots.txt file.
    pub robots: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: "posts".into(),
            extension: "md".to_string(),
            templates: "templates".into(),
            assets: "assets".into(),
            robots: "robots.txt".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::test_parse_config;

    #[test]
    fn test_paths_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.paths.posts, PathBuf::from("posts"));
        assert_eq!(config.paths.extension, "md");
        assert_eq!(config.paths.templates, PathBuf::from("templates"));
    }

    #[test]
    fn test_paths_override() {
        let config =
            test_parse_config("[paths]\nposts = \"content/posts\"\nextension = \"markdown\"");

        assert_eq!(config.paths.posts, PathBuf::from("content/posts"));
        assert_eq!(config.paths.extension, "markdown");
        assert_eq!(config.paths.assets, PathBuf::from("assets"));
    }
}
