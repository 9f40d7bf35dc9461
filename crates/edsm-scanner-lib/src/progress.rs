//! Completion counting for the detail fan-out.
//!
//! [`ProgressTracker`] is shared by every worker of one fetch. Each finished
//! fetch calls [`ProgressTracker::increment`]. The fan-out calls
//! [`ProgressTracker::finish`] when it ends, even on failure, and only the
//! first call reaches the observer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::observer::ProgressObserver;

/// Thread-safe completion counter with a fixed total.
///
/// State is reported through the injected [`ProgressObserver`]; the tracker
/// itself never writes anywhere.
pub struct ProgressTracker {
    completed: AtomicUsize,
    total: usize,
    finished: AtomicBool,
    observer: Arc<dyn ProgressObserver>,
}

impl ProgressTracker {
    pub fn new(total: usize, observer: Arc<dyn ProgressObserver>) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            finished: AtomicBool::new(false),
            observer,
        }
    }

    /// Advance the counter by one and report the new value.
    pub fn increment(&self) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.observer.on_progress(completed, self.total);
        completed
    }

    /// Signal the terminal state. Only the first call reaches the observer.
    pub fn finish(&self) {
        if !self.finished.swap(true, Ordering::SeqCst) {
            self.observer.on_finished(self.completed(), self.total);
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("completed", &self.completed())
            .field("total", &self.total)
            .field("finished", &self.is_finished())
            .finish()
    }
}
