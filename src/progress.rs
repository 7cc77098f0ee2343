//! Shared progress counter for deletion jobs.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running count of files removed by the current job.
///
/// One writer (the deletion job) stores whole values; any number of readers
/// poll it. Stores never tear and never block a reader, so no lock is needed.
#[derive(Debug, Default)]
pub struct ProgressCounter(AtomicU64);

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published value.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Publish a new running total.
    pub fn publish(&self, value: u64) {
        self.0.store(value, Ordering::Release);
    }

    /// Back to zero before starting another job.
    pub fn reset(&self) {
        self.publish(0);
    }
}
