//! Posts directory watcher.
//!
//! ```text
//! notify callback ──► crossbeam channel ──► drain thread ──► Invalidate::invalidate
//! ```
//!
//! The watcher is non-recursive and only marks the site stale; the next
//! request that needs posts performs the actual rescan.

mod types;

pub use types::{ChangeKind, is_temp_file};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::{debug, log};

/// Something that can be marked stale.
pub trait Invalidate: Send + Sync {
    fn invalidate(&self);
}

/// Live directory watch. Dropping it stops delivery of new events.
pub struct PostWatcher {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl PostWatcher {
    /// Start watching `dir` and invalidate `target` on every change.
    pub fn spawn(dir: &Path, target: Arc<dyn Invalidate>) -> Result<Self> {
        let (tx, rx) = channel::unbounded();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .context("failed to create file watcher")?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;

        thread::Builder::new()
            .name("quire-watch".into())
            .spawn(move || drain(&rx, target.as_ref()))
            .context("failed to spawn watcher thread")?;

        Ok(Self {
            dir: dir.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Forward watcher events until the sending side is dropped.
fn drain(rx: &Receiver<notify::Result<notify::Event>>, target: &dyn Invalidate) {
    while let Ok(result) = rx.recv() {
        match result {
            Ok(event) => handle_event(&event, target),
            Err(e) => log!("watch"; "notify error: {}", e),
        }
    }
}

fn handle_event(event: &notify::Event, target: &dyn Invalidate) {
    let Some(kind) = ChangeKind::from_event(&event.kind) else {
        return;
    };

    let relevant: Vec<_> = event
        .paths
        .iter()
        .filter(|path| !is_temp_file(path))
        .collect();
    // Some backends report directory-level events without paths.
    if relevant.is_empty() && !event.paths.is_empty() {
        return;
    }

    for path in &relevant {
        debug!("watch"; "{} {}", kind.label(), path.display());
    }
    target.invalidate();
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Invalidate for Counter {
        fn invalidate(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Counter {
        fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn event(kind: EventKind, path: &str) -> notify::Result<notify::Event> {
        Ok(notify::Event::new(kind).add_path(PathBuf::from(path)))
    }

    #[test]
    fn test_drain_invalidates_on_changes() {
        let (tx, rx) = channel::unbounded();
        tx.send(event(EventKind::Create(CreateKind::File), "posts/a.md"))
            .unwrap();
        tx.send(event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "posts/a.md",
        ))
        .unwrap();
        drop(tx);

        let counter = Counter::default();
        drain(&rx, &counter);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_drain_skips_noise() {
        let (tx, rx) = channel::unbounded();
        tx.send(event(EventKind::Access(AccessKind::Any), "posts/a.md"))
            .unwrap();
        tx.send(event(EventKind::Create(CreateKind::File), "posts/.a.md.swp"))
            .unwrap();
        tx.send(Err(notify::Error::generic("boom"))).unwrap();
        drop(tx);

        let counter = Counter::default();
        drain(&rx, &counter);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_dotfile_post_invalidates() {
        let counter = Counter::default();
        let event = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("posts/.draft.md"));
        handle_event(&event, &counter);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_pathless_event_invalidates() {
        let counter = Counter::default();
        handle_event(&notify::Event::new(EventKind::Any), &counter);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_spawn_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let target: Arc<dyn Invalidate> = Arc::new(Counter::default());
        assert!(PostWatcher::spawn(&dir.path().join("missing"), target).is_err());
    }

    #[test]
    fn test_spawn_sees_new_file() {
        let dir = TempDir::new().unwrap();
        let counter = Arc::new(Counter::default());
        let watcher = PostWatcher::spawn(dir.path(), counter.clone()).unwrap();
        assert_eq!(watcher.dir(), dir.path());

        std::fs::write(dir.path().join("new.md"), "+++\n+++\n").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while counter.get() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(counter.get() > 0);
    }
}
