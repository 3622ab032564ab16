//! Atom feed: template rendering, minification and the cached artifact.
//!
//! ```text
//! PostIndex::latest(limit) ──► FeedBuilder::build ──► FeedCache::update
//!                              (tera + minify)        (etag, last-modified)
//! ```

mod build;
mod cache;
pub mod minify;

pub use build::FeedBuilder;
pub use cache::{FeedArtifact, FeedCache};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read feed template {0}")]
    Io(PathBuf, #[source] io::Error),

    #[error("feed template error")]
    Template(#[from] tera::Error),

    #[error("feed is not well-formed XML")]
    Minify(#[from] quick_xml::Error),
}
