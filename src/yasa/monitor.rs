use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// Progress and cancellation shared between a sampler and its observers.
/// Clones share the same state, so a clone can be moved to another thread.
///
/// # Example
///
/// ```
/// use yasa::yasa::Monitor;
/// let monitor = Monitor::default();
/// let observer = monitor.clone();
/// observer.cancel();
/// assert!(monitor.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Monitor {
    cancelled: Arc<AtomicBool>,
    step: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    pass: Arc<AtomicUsize>,
}

impl Monitor {
    /// ask the sampler to stop at the next combination.
    /// The request holds until a sampling run ends.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
    /// return the number of combinations processed so far.
    pub fn current_step(&self) -> usize {
        self.step.load(Ordering::Relaxed)
    }
    /// return the number of combinations to be processed in all passes,
    /// saturated at `usize::MAX`.
    pub fn total_steps(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }
    /// return the 1-based number of the running pass.
    pub fn current_pass(&self) -> usize {
        self.pass.load(Ordering::Relaxed)
    }
    pub(crate) fn start(&self, total: usize) {
        self.step.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.pass.store(0, Ordering::Relaxed);
    }
    /// mark all steps done; rebuild passes may be skipped.
    pub(crate) fn finish(&self) {
        self.step.store(self.total_steps(), Ordering::Relaxed);
    }
    pub(crate) fn resume(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
    pub(crate) fn next_pass(&self) {
        self.pass.fetch_add(1, Ordering::Relaxed);
    }
    pub(crate) fn step(&self) {
        self.step.fetch_add(1, Ordering::Relaxed);
    }
}
