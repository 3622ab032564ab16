//! Cached feed bytes with HTTP validators.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use crate::utils::{date, hash};

/// Minified feed plus its `ETag` and `Last-Modified` values.
///
/// Starts empty; validators only change when the bytes do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedArtifact {
    pub bytes: Vec<u8>,
    pub etag: String,
    pub last_modified: String,
}

impl FeedArtifact {
    fn new(bytes: Vec<u8>, now: DateTime<Utc>) -> Self {
        Self {
            etag: hash::etag(&bytes),
            last_modified: date::to_http_date(now),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Current feed artifact behind an atomic pointer.
///
/// Writers must be serialized by the caller (the refresh gate does this).
#[derive(Debug, Default)]
pub struct FeedCache {
    current: ArcSwap<FeedArtifact>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Arc<FeedArtifact> {
        self.current.load_full()
    }

    /// Store `bytes` if they differ from the cached ones.
    ///
    /// Returns `true` when the artifact was replaced.
    pub fn update(&self, bytes: Vec<u8>, now: DateTime<Utc>) -> bool {
        if self.current.load().bytes == bytes {
            return false;
        }
        self.current.store(Arc::new(FeedArtifact::new(bytes, now)));
        true
    }
}
