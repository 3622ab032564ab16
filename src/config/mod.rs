//! Site configuration management for `quire.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── feed       # [feed]
//! │   ├── paths      # [paths]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── error          # ConfigError
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section   | Purpose                                          |
//! |-----------|--------------------------------------------------|
//! | `[site]`  | Site metadata (title, author, url, language)     |
//! | `[paths]` | Posts, templates, assets and robots.txt paths    |
//! | `[feed]`  | Feed template and entry limit                    |
//! | `[serve]` | HTTP server (interface, port, watch, debug)      |
//!
//! The config file is optional: when it does not exist every section
//! uses its defaults and paths resolve against the current directory.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{FeedConfig, PathsConfig, ServeConfig, SiteInfo};

use crate::cli::{Cli, Commands};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing quire.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteInfo,

    /// Content and template locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;
        let config_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.root = config_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        config.config_path = config_path;
        config.site.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without resolving paths.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::parse(&content)
    }

    /// Parse config content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface,
            port,
            watch,
            debug,
        } = &cli.command
        {
            if let Some(interface) = interface {
                self.serve.interface = *interface;
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
            if let Some(watch) = watch {
                self.serve.watch = *watch;
            }
            if *debug {
                self.serve.debug = true;
            }
        }
    }

    /// Validate values that cannot be expressed in the type system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.limit == 0 {
            return Err(ConfigError::Validation(
                "feed.limit must be greater than 0".to_string(),
            ));
        }
        let ext = &self.paths.extension;
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "paths.extension must be non-empty and without a leading dot, got `{ext}`"
            )));
        }
        Ok(())
    }

    /// Resolve a config-relative path against the project root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.root_join(&self.paths.posts)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root_join(&self.paths.templates)
    }

    pub fn feed_template_path(&self) -> PathBuf {
        self.templates_dir().join(&self.feed.template)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root_join(&self.paths.assets)
    }

    pub fn robots_path(&self) -> PathBuf {
        self.root_join(&self.paths.robots)
    }
}

/// Parse config content for tests, panicking on error.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let mut config = SiteConfig::parse(content).expect("config should parse");
    config.site.normalize();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load(&dir.path().join("quire.toml")).unwrap();

        assert_eq!(config.root, dir.path());
        assert_eq!(config.posts_dir(), dir.path().join("posts"));
        assert_eq!(
            config.feed_template_path(),
            dir.path().join("templates").join("feed.xml")
        );
    }

    #[test]
    fn test_load_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quire.toml");
        fs::write(&path, "[paths]\nposts = \"writing\"\n[site]\nurl = \"https://a.b/\"").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.posts_dir(), dir.path().join("writing"));
        assert_eq!(config.robots_path(), dir.path().join("robots.txt"));
        assert_eq!(config.site.url, "https://a.b");
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quire.toml");
        fs::write(&path, "[serve\nport = ").unwrap();

        assert!(matches!(SiteConfig::load(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_validate_limit() {
        let config = test_parse_config("[feed]\nlimit = 0");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_extension() {
        let config = test_parse_config("[paths]\nextension = \".md\"");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = test_parse_config("[paths]\nextension = \"\"");
        assert!(config.validate().is_err());
    }
}
