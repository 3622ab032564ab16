//! Single-flight refresh gate.
//!
//! Two counters track work: `requested` is bumped by every reset,
//! `completed` records the `requested` value the last run started from.
//! The gate is dirty while they differ. A run snapshots `requested`
//! before doing work, so a reset that lands mid-run leaves the gate dirty
//! for the next caller.
//!
//! Callers that find the gate dirty queue on the mutex. The first one
//! runs the work; the rest wake up, see the gate clean, and return.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

#[derive(Debug)]
pub struct RefreshGate {
    requested: AtomicU64,
    completed: AtomicU64,
    lock: Mutex<()>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    /// A gate that starts dirty.
    pub fn new() -> Self {
        Self {
            requested: AtomicU64::new(1),
            completed: AtomicU64::new(0),
            lock: Mutex::new(()),
        }
    }

    /// Mark the gate dirty.
    pub fn reset(&self) {
        self.requested.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_dirty(&self) -> bool {
        self.requested.load(Ordering::Acquire) != self.completed.load(Ordering::Acquire)
    }

    /// Run `f` if the gate is dirty, at most once per reset.
    ///
    /// Returns `None` when another caller already did the work.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        if !self.is_dirty() {
            return None;
        }

        let _guard = self.lock.lock();
        if !self.is_dirty() {
            return None;
        }
        Some(self.run_locked(f))
    }

    /// Run `f` unconditionally, serialized with other runs.
    pub fn force<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock.lock();
        self.run_locked(f)
    }

    fn run_locked<R>(&self, f: impl FnOnce() -> R) -> R {
        let target = self.requested.load(Ordering::Acquire);
        let result = f();
        self.completed.store(target, Ordering::Release);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_starts_dirty() {
        let gate = RefreshGate::new();
        assert!(gate.is_dirty());
        assert_eq!(gate.run(|| 1), Some(1));
        assert!(!gate.is_dirty());
        assert_eq!(gate.run(|| 2), None);
    }

    #[test]
    fn test_reset_reopens() {
        let gate = RefreshGate::new();
        gate.run(|| ());
        gate.reset();
        gate.reset();

        assert_eq!(gate.run(|| "again"), Some("again"));
        assert_eq!(gate.run(|| "again"), None);
    }

    #[test]
    fn test_force_always_runs() {
        let gate = RefreshGate::new();
        assert_eq!(gate.force(|| 1), 1);
        assert_eq!(gate.force(|| 2), 2);
        assert!(!gate.is_dirty());
    }

    #[test]
    fn test_reset_during_run_is_not_lost() {
        let gate = RefreshGate::new();
        gate.run(|| gate.reset());

        assert!(gate.is_dirty());
        assert!(gate.run(|| ()).is_some());
        assert!(!gate.is_dirty());
    }

    #[test]
    fn test_concurrent_callers_run_once() {
        const THREADS: usize = 8;

        let gate = Arc::new(RefreshGate::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let runs = Arc::clone(&runs);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    gate.run(|| {
                        thread::sleep(Duration::from_millis(20));
                        runs.fetch_add(1, Ordering::SeqCst);
                    });
                    // Every caller returns only after the work is done.
                    assert!(!gate.is_dirty());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
