//! The site service: post index, feed artifact and refresh gate.
//!
//! # Refresh flow
//!
//! ```text
//! invalidate() ──► gate dirty
//!
//! index() / post() / feed()
//!   └─► ensure_fresh() ── gate clean ──► read current snapshot
//!              │
//!              └─ gate dirty ──► rebuild (single flight)
//!                                  ├─ scan_posts        (parallel parse)
//!                                  ├─ PostStore::replace
//!                                  ├─ FeedBuilder::build
//!                                  └─ FeedCache::update (validators)
//! ```
//!
//! A feed that fails to render keeps the previous artifact; the index is
//! still replaced.

mod gate;

pub use gate::RefreshGate;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::feed::{FeedArtifact, FeedBuilder, FeedCache};
use crate::post::{Post, PostLayout};
use crate::store::{PostIndex, PostStore, ScanReport, SkippedPost, scan_posts};
use crate::template::{self, Clock};
use crate::watch::Invalidate;
use crate::{debug, log};

/// What happened to the feed during a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Rebuilt bytes matched the cached ones.
    Unchanged,
    /// New bytes, new validators.
    Updated,
    /// Rendering failed; the previous artifact is still served.
    Stale,
}

/// Outcome of one rebuild.
#[derive(Debug)]
pub struct RefreshReport {
    /// Number of posts in the new index.
    pub posts: usize,
    pub skipped: Vec<SkippedPost>,
    pub feed: FeedStatus,
}

/// Shared blog state. Wrap in `Arc` and hand to request handlers.
#[derive(Debug)]
pub struct Site {
    layout: PostLayout,
    store: PostStore,
    feed: FeedCache,
    builder: FeedBuilder,
    gate: RefreshGate,
    refreshes: AtomicUsize,
    clock: Clock,
}

impl Site {
    pub fn new(layout: PostLayout, builder: FeedBuilder, clock: Clock) -> Self {
        Self {
            layout,
            store: PostStore::new(),
            feed: FeedCache::new(),
            builder,
            gate: RefreshGate::new(),
            refreshes: AtomicUsize::new(0),
            clock,
        }
    }

    /// Build the service from config. Fails if the feed template cannot be
    /// read or parsed.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let clock: Clock = template::system_clock;
        let builder = FeedBuilder::from_config(config, clock).with_context(|| {
            format!(
                "failed to load feed template {}",
                config.feed_template_path().display()
            )
        })?;
        Ok(Self::new(PostLayout::from_config(config), builder, clock))
    }

    pub fn layout(&self) -> &PostLayout {
        &self.layout
    }

    /// Rebuild if a change was signalled since the last rebuild.
    pub fn ensure_fresh(&self) -> Option<RefreshReport> {
        self.gate.run(|| self.rebuild())
    }

    /// Current index, refreshed if needed.
    pub fn index(&self) -> Arc<PostIndex> {
        self.ensure_fresh();
        self.store.load()
    }

    /// Look up a post by id, refreshed if needed.
    pub fn post(&self, id: &str) -> Option<Arc<Post>> {
        self.index().get(id).cloned()
    }

    /// Current feed artifact, refreshed if needed.
    pub fn feed(&self) -> Arc<FeedArtifact> {
        self.ensure_fresh();
        self.feed.load()
    }

    /// Mark the site stale. The next read rebuilds.
    pub fn invalidate(&self) {
        self.gate.reset();
    }

    /// Rebuild now, regardless of the gate.
    pub fn refresh(&self) -> RefreshReport {
        self.gate.force(|| self.rebuild())
    }

    /// Number of completed rebuilds.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::Acquire)
    }

    fn rebuild(&self) -> RefreshReport {
        let ScanReport { posts, skipped } = scan_posts(&self.layout);
        for item in &skipped {
            log!("posts"; "skipped {}: {}", item.path.display(), item.reason());
        }

        let index = PostIndex::new(posts);
        let count = index.len();
        let feed = self.rebuild_feed(&index);
        self.store.replace(index);
        self.refreshes.fetch_add(1, Ordering::AcqRel);

        debug!("posts"; "indexed {} posts, {} skipped, feed {:?}", count, skipped.len(), feed);
        RefreshReport {
            posts: count,
            skipped,
            feed,
        }
    }

    fn rebuild_feed(&self, index: &PostIndex) -> FeedStatus {
        match self.builder.build(index.latest(self.builder.limit())) {
            Ok(bytes) => {
                if self.feed.update(bytes, (self.clock)()) {
                    FeedStatus::Updated
                } else {
                    FeedStatus::Unchanged
                }
            }
            Err(e) => {
                log!("feed"; "keeping previous feed: {:#}", anyhow::Error::from(e));
                FeedStatus::Stale
            }
        }
    }
}

impl Invalidate for Site {
    fn invalidate(&self) {
        Site::invalidate(self);
    }
}
