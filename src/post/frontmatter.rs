//! TOML front matter extraction.
//!
//! A post starts with a metadata block delimited by two `+++` markers:
//!
//! ```text
//! +++
//! Title = "Hello"
//! Datetime = 2024-01-01T00:00:00Z
//! +++
//! # Markdown body
//! ```
//!
//! Anything before the first marker is ignored. The body starts after
//! the second marker, minus the line break that ends the marker line.

use serde::Deserialize;
use toml::value::Datetime;

use super::PostError;
use crate::utils::date;

/// Front matter delimiter.
pub const MARKER: &str = "+++";

/// Raw front matter and body slices of a post source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// TOML text between the markers.
    pub meta: &'a str,
    /// Markdown text after the closing marker.
    pub body: &'a str,
}

/// Decoded front matter fields.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMeta {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    /// Missing means the zero time; such posts sort last.
    #[serde(rename = "Datetime", alias = "datetime", default)]
    pub datetime: Option<Datetime>,
}

impl PostMeta {
    /// Decode the TOML metadata block.
    pub fn parse(meta: &str) -> Result<Self, PostError> {
        Ok(toml::from_str(meta)?)
    }

    /// Post timestamp normalized to UTC.
    pub fn datetime_utc(&self) -> Result<chrono::DateTime<chrono::Utc>, PostError> {
        match &self.datetime {
            Some(dt) => {
                date::from_toml(dt).ok_or_else(|| PostError::InvalidDatetime(dt.to_string()))
            }
            None => Ok(date::zero()),
        }
    }
}

/// Split a post source into front matter and body.
///
/// Returns `None` unless the marker appears at least twice.
pub fn split(source: &str) -> Option<Frontmatter<'_>> {
    let open = source.find(MARKER)?;
    let meta_start = open + MARKER.len();
    let close = meta_start + source[meta_start..].find(MARKER)?;
    let body_start = close + MARKER.len();

    Some(Frontmatter {
        meta: &source[meta_start..close],
        body: strip_line_break(&source[body_start..]),
    })
}

/// Drop one leading line break (`\n` or `\r\n`).
#[inline]
fn strip_line_break(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let source = "+++\nTitle = \"Hello\"\n+++\n# Hi\n";
        let fm = split(source).unwrap();

        assert_eq!(fm.meta, "\nTitle = \"Hello\"\n");
        assert_eq!(fm.body, "# Hi\n");
    }

    #[test]
    fn test_split_crlf() {
        let source = "+++\r\nTitle = \"Hello\"\r\n+++\r\nbody";
        let fm = split(source).unwrap();
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn test_split_single_marker() {
        assert!(split("+++\nTitle = \"Hello\"\n# Hi").is_none());
        assert!(split("# Just content").is_none());
    }

    #[test]
    fn test_split_leading_text_is_ignored() {
        let fm = split("preamble\n+++\na = 1\n+++\nbody").unwrap();
        assert_eq!(fm.meta, "\na = 1\n");
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn test_split_markers_in_body_are_kept() {
        let fm = split("+++\na = 1\n+++\nx\n+++\ny").unwrap();
        assert_eq!(fm.body, "x\n+++\ny");
    }

    #[test]
    fn test_split_empty_body() {
        let fm = split("+++\na = 1\n+++").unwrap();
        assert_eq!(fm.body, "");
    }

    #[test]
    fn test_meta_parse() {
        let meta = PostMeta::parse("Title = \"Hello\"\nDatetime = 2024-01-01T00:00:00Z\n").unwrap();
        assert_eq!(meta.title, "Hello");
        assert_eq!(
            date::to_rfc3339(meta.datetime_utc().unwrap()),
            "2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_meta_lowercase_keys() {
        let meta = PostMeta::parse("title = \"Hello\"\ndatetime = 2024-01-01").unwrap();
        assert_eq!(meta.title, "Hello");
    }

    #[test]
    fn test_meta_extra_fields_ignored() {
        let meta =
            PostMeta::parse("Title = \"Hello\"\nDatetime = 2024-01-01\nTags = [\"a\"]").unwrap();
        assert_eq!(meta.title, "Hello");
    }

    #[test]
    fn test_meta_invalid() {
        assert!(matches!(
            PostMeta::parse("Title = \nDatetime = 2024-01-01"),
            Err(PostError::InvalidFrontmatter(_))
        ));
        assert!(matches!(
            PostMeta::parse("Title = \"x\"\nDatetime = \"yesterday\""),
            Err(PostError::InvalidFrontmatter(_))
        ));
    }

    #[test]
    fn test_meta_missing_datetime_is_zero_time() {
        let meta = PostMeta::parse("Title = \"Hello\"").unwrap();
        assert!(meta.datetime.is_none());
        assert_eq!(
            date::to_rfc3339(meta.datetime_utc().unwrap()),
            "0001-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_meta_time_only_datetime() {
        let meta = PostMeta::parse("Title = \"x\"\nDatetime = 10:00:00").unwrap();
        assert!(matches!(
            meta.datetime_utc(),
            Err(PostError::InvalidDatetime(_))
        ));
    }
}
