//! Feed rendering.
//!
//! The feed is a plain-text tera template (no autoescape) rendered with
//! the newest posts and the site info, then minified.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use super::FeedError;
use super::minify::minify_xml;
use crate::config::{SiteConfig, SiteInfo};
use crate::post::{Post, PostView};
use crate::template::{self, Clock};

const TEMPLATE_NAME: &str = "feed";

#[derive(Serialize)]
struct FeedContext<'a> {
    posts: Vec<PostView<'a>>,
    site: &'a SiteInfo,
}

/// Compiled feed template plus the settings it renders with.
pub struct FeedBuilder {
    tera: Tera,
    limit: usize,
    site: SiteInfo,
}

impl FeedBuilder {
    /// Load the feed template named by the config.
    pub fn from_config(config: &SiteConfig, clock: Clock) -> Result<Self, FeedError> {
        Self::from_file(
            &config.feed_template_path(),
            config.feed.limit,
            config.site.clone(),
            clock,
        )
    }

    pub fn from_file(
        path: &Path,
        limit: usize,
        site: SiteInfo,
        clock: Clock,
    ) -> Result<Self, FeedError> {
        let source =
            fs::read_to_string(path).map_err(|e| FeedError::Io(path.to_path_buf(), e))?;
        Self::from_source(&source, limit, site, clock)
    }

    /// Compile a feed template from source.
    pub fn from_source(
        source: &str,
        limit: usize,
        site: SiteInfo,
        clock: Clock,
    ) -> Result<Self, FeedError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        template::register_helpers(&mut tera, clock);
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        Ok(Self { tera, limit, site })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Render the unminified feed for the newest `limit` posts.
    ///
    /// `posts` must already be sorted newest first.
    pub fn render(&self, posts: &[Arc<Post>]) -> Result<String, FeedError> {
        let posts = &posts[..self.limit.min(posts.len())];
        let ctx = FeedContext {
            posts: posts.iter().map(|p| p.view()).collect(),
            site: &self.site,
        };
        let ctx = Context::from_serialize(&ctx)?;
        Ok(self.tera.render(TEMPLATE_NAME, &ctx)?)
    }

    /// Render and minify.
    pub fn build(&self, posts: &[Arc<Post>]) -> Result<Vec<u8>, FeedError> {
        let xml = self.render(posts)?;
        Ok(minify_xml(&xml)?)
    }
}

impl std::fmt::Debug for FeedBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedBuilder")
            .field("limit", &self.limit)
            .field("site", &self.site.title)
            .finish_non_exhaustive()
    }
}
