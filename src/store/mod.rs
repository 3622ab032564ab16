//! In-memory post index.
//!
//! `PostIndex` holds two views of the same post set: a map keyed by id
//! and a sequence sorted newest first. Both views are built together and
//! never mutated; `PostStore` replaces the whole index with one atomic
//! pointer swap so readers always see a matching pair.

mod scan;

pub use scan::{ScanReport, SkippedPost, SkippedSummary, scan_posts};

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::post::Post;

/// Immutable snapshot of all ingested posts.
#[derive(Debug, Default)]
pub struct PostIndex {
    by_id: FxHashMap<String, Arc<Post>>,
    ordered: Vec<Arc<Post>>,
}

impl PostIndex {
    /// Build an index from posts in scan order.
    ///
    /// Ties on `datetime` keep scan order. When two posts share an id the
    /// later one wins and the earlier one is dropped from both views.
    pub fn new(posts: Vec<Post>) -> Self {
        let mut last_seen: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, post) in posts.iter().enumerate() {
            last_seen.insert(post.id.as_str(), i);
        }
        let keep: Vec<bool> = posts
            .iter()
            .enumerate()
            .map(|(i, post)| last_seen.get(post.id.as_str()) == Some(&i))
            .collect();
        drop(last_seen);

        let mut ordered: Vec<Arc<Post>> = posts
            .into_iter()
            .zip(keep)
            .filter_map(|(post, keep)| keep.then(|| Arc::new(post)))
            .collect();
        ordered.sort_by(|a, b| b.datetime.cmp(&a.datetime));

        let by_id = ordered
            .iter()
            .map(|post| (post.id.clone(), Arc::clone(post)))
            .collect();

        Self { by_id, ordered }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Post>> {
        self.by_id.get(id)
    }

    /// All posts, newest first.
    pub fn ordered(&self) -> &[Arc<Post>] {
        &self.ordered
    }

    /// The `n` most recent posts.
    pub fn latest(&self, n: usize) -> &[Arc<Post>] {
        &self.ordered[..n.min(self.ordered.len())]
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Atomically swappable holder of the current index.
#[derive(Debug, Default)]
pub struct PostStore {
    current: ArcSwap<PostIndex>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<PostIndex> {
        self.current.load_full()
    }

    /// Replace the current snapshot.
    pub fn replace(&self, index: PostIndex) {
        self.current.store(Arc::new(index));
    }
}
