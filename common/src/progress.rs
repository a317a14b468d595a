use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Shared counter of finished work units. Mesh loading counts bytes read and
/// a sweep counts offsets over all planes. Cloning gives another handle to the
/// same counter, so a CLI can poll it while a worker thread advances it.
#[derive(Clone)]
pub struct Progress(Arc<ProgressInner>);

struct ProgressInner {
    complete: AtomicU64,
    total: AtomicU64,
}

impl Progress {
    pub fn new() -> Self {
        Self(Arc::new(ProgressInner {
            complete: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }))
    }

    /// Fraction done in `0.0..=1.0`, zero until a total is known.
    pub fn progress(&self) -> f32 {
        let total = self.0.total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }

        self.0.complete.load(Ordering::Relaxed) as f32 / total as f32
    }

    /// True once a total is set and reached.
    pub fn complete(&self) -> bool {
        let total = self.0.total.load(Ordering::Relaxed);
        if total == 0 {
            return false;
        }

        self.0.complete.load(Ordering::Relaxed) >= total
    }

    pub fn completed(&self) -> u64 {
        self.0.complete.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.0.total.load(Ordering::Relaxed)
    }

    pub fn set_total(&self, total: u64) {
        self.0.total.store(total, Ordering::Relaxed);
    }

    pub fn set_complete(&self, complete: u64) {
        self.0.complete.store(complete, Ordering::Relaxed);
    }

    /// Records `count` more finished units.
    pub fn add_complete(&self, count: u64) {
        self.0.complete.fetch_add(count, Ordering::Relaxed);
    }

    /// Marks all work as done, even if some units were never reported.
    pub fn set_finished(&self) {
        let total = self.0.total.load(Ordering::Relaxed);
        self.0.complete.store(total, Ordering::Relaxed);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
