//! Blog posts.
//!
//! A post is a single file in the posts directory: TOML front matter
//! between `+++` markers followed by a Markdown body.
//!
//! ```text
//! posts/2024-01-01.md  ->  Post { id: "2024-01-01", title, datetime, content }
//! ```

pub mod frontmatter;
pub mod render;

pub use render::MarkdownOptions;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::utils::date;
use frontmatter::PostMeta;

/// Per-file ingestion failure. Never fatal to a refresh.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to read {0}")]
    Io(PathBuf, #[source] io::Error),

    #[error("missing front matter (expected two `{}` markers)", frontmatter::MARKER)]
    MissingFrontmatter,

    #[error("invalid front matter")]
    InvalidFrontmatter(#[from] toml::de::Error),

    #[error("invalid datetime `{0}` (a date is required)")]
    InvalidDatetime(String),

    #[error("cannot derive post id from {0}")]
    InvalidPath(PathBuf),
}

/// Where posts live and how they are read.
#[derive(Debug, Clone)]
pub struct PostLayout {
    /// Posts directory.
    pub dir: PathBuf,
    /// Post file extension, without the dot.
    pub extension: String,
    pub markdown: MarkdownOptions,
}

impl PostLayout {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            markdown: MarkdownOptions::common(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.posts_dir(), config.paths.extension.clone())
    }

    /// Whether `path` carries the post extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension.as_str())
    }

    /// Derive a post id: the path relative to the posts directory with
    /// the extension trimmed.
    pub fn id_for(&self, path: &Path) -> Result<String, PostError> {
        let invalid = || PostError::InvalidPath(path.to_path_buf());

        let rel = path.strip_prefix(&self.dir).map_err(|_| invalid())?;
        let rel = rel.to_str().ok_or_else(invalid)?;
        let stem = rel
            .strip_suffix(self.extension.as_str())
            .and_then(|s| s.strip_suffix('.'))
            .ok_or_else(invalid)?;

        if stem.is_empty() {
            return Err(invalid());
        }
        Ok(stem.replace('\\', "/"))
    }
}

/// One published article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Always UTC.
    pub datetime: DateTime<Utc>,
    /// Rendered HTML fragment.
    pub content: String,
    /// Source file, for diagnostics.
    pub source: PathBuf,
}

impl Post {
    /// Read and parse a post file.
    pub fn load(path: &Path, layout: &PostLayout) -> Result<Self, PostError> {
        let id = layout.id_for(path)?;
        let bytes = fs::read(path).map_err(|e| PostError::Io(path.to_path_buf(), e))?;
        // invalid UTF-8 becomes U+FFFD instead of dropping the post
        let source = String::from_utf8_lossy(&bytes);
        Self::from_source(id, path, &source, &layout.markdown)
    }

    /// Parse a post from its raw text.
    pub fn from_source(
        id: impl Into<String>,
        path: &Path,
        source: &str,
        markdown: &MarkdownOptions,
    ) -> Result<Self, PostError> {
        let fm = frontmatter::split(source).ok_or(PostError::MissingFrontmatter)?;
        let meta = PostMeta::parse(fm.meta)?;
        let datetime = meta.datetime_utc()?;

        Ok(Self {
            id: id.into(),
            title: meta.title,
            datetime,
            content: render::render_markdown(fm.body, markdown),
            source: path.to_path_buf(),
        })
    }

    /// Template-facing view.
    pub fn view(&self) -> PostView<'_> {
        PostView {
            id: &self.id,
            title: &self.title,
            datetime: date::to_rfc3339(self.datetime),
            content: &self.content,
        }
    }
}

/// Serialized form of a post handed to templates.
#[derive(Debug, Serialize)]
pub struct PostView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    /// RFC 3339, UTC.
    pub datetime: String,
    pub content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELLO: &str = "+++\nTitle = \"Hello\"\nDatetime = 2024-01-01T00:00:00Z\n+++\n# Hi\n";

    #[test]
    fn test_id_for() {
        let layout = PostLayout::new("/blog/posts", "md");

        assert_eq!(
            layout.id_for(Path::new("/blog/posts/2024-01-01.md")).unwrap(),
            "2024-01-01"
        );
        assert_eq!(
            layout.id_for(Path::new("/blog/posts/a.b.md")).unwrap(),
            "a.b"
        );
    }

    #[test]
    fn test_id_for_rejects_bad_paths() {
        let layout = PostLayout::new("/blog/posts", "md");

        for path in [
            "/elsewhere/a.md",
            "/blog/posts/a.txt",
            "/blog/posts/.md",
            "/blog/posts/amd",
        ] {
            assert!(
                matches!(layout.id_for(Path::new(path)), Err(PostError::InvalidPath(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_matches() {
        let layout = PostLayout::new("posts", "md");
        assert!(layout.matches(Path::new("posts/a.md")));
        assert!(!layout.matches(Path::new("posts/a.markdown")));
        assert!(!layout.matches(Path::new("posts/md")));
    }

    #[test]
    fn test_from_source() {
        let post = Post::from_source(
            "2024-01-01",
            Path::new("posts/2024-01-01.md"),
            HELLO,
            &MarkdownOptions::common(),
        )
        .unwrap();

        assert_eq!(post.id, "2024-01-01");
        assert_eq!(post.title, "Hello");
        assert_eq!(date::to_rfc3339(post.datetime), "2024-01-01T00:00:00Z");
        assert!(post.content.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_from_source_normalizes_offset() {
        let src = "+++\nTitle = \"x\"\nDatetime = 2024-01-01T02:00:00+02:00\n+++\n";
        let post = Post::from_source("x", Path::new("x.md"), src, &MarkdownOptions::common())
            .unwrap();
        assert_eq!(date::to_rfc3339(post.datetime), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_from_source_missing_markers() {
        let err = Post::from_source(
            "x",
            Path::new("x.md"),
            "+++\nTitle = \"x\"\n",
            &MarkdownOptions::common(),
        )
        .unwrap_err();
        assert!(matches!(err, PostError::MissingFrontmatter));
    }

    #[test]
    fn test_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2024-01-01.md");
        fs::write(&path, HELLO).unwrap();

        let layout = PostLayout::new(dir.path(), "md");
        let post = Post::load(&path, &layout).unwrap();

        assert_eq!(post.id, "2024-01-01");
        assert_eq!(post.source, path);
    }

    #[test]
    fn test_load_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.md");
        let mut source = b"+++\nTitle = \"Caf\"\nDatetime = 2024-01-01\n+++\ncaf".to_vec();
        source.push(0xe9);
        fs::write(&path, source).unwrap();

        let post = Post::load(&path, &PostLayout::new(dir.path(), "md")).unwrap();
        assert_eq!(post.id, "latin1");
        assert!(post.content.contains("caf\u{fffd}"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let layout = PostLayout::new(dir.path(), "md");

        let err = Post::load(&dir.path().join("gone.md"), &layout).unwrap_err();
        assert!(matches!(err, PostError::Io(..)));
    }

    #[test]
    fn test_view() {
        let post = Post::from_source("a", Path::new("a.md"), HELLO, &MarkdownOptions::common())
            .unwrap();
        let json = serde_json::to_value(post.view()).unwrap();

        assert_eq!(json["id"], "a");
        assert_eq!(json["datetime"], "2024-01-01T00:00:00Z");
        assert!(json.get("source").is_none());
    }
}
