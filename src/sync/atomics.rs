//! Atomic helpers for statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// An atomic counter for statistics.
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    /// Create a new counter.
    pub const fn new(initial: u64) -> Self {
        Self(AtomicU64::new(initial))
    }

    /// Increment the counter.
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Add a value to the counter.
    pub fn add(&self, value: u64) {
        self.0.fetch_add(value, Ordering::Relaxed);
    }

    /// Get the current value.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// An atomic high-water mark (only ever moves up).
pub struct AtomicMax(AtomicU64);

impl AtomicMax {
    /// Create a new high-water mark.
    pub const fn new(initial: u64) -> Self {
        Self(AtomicU64::new(initial))
    }

    /// Record a value, keeping the larger of it and the current mark.
    pub fn record(&self, value: u64) {
        self.0.fetch_max(value, Ordering::Relaxed);
    }

    /// Get the current mark.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for AtomicMax {
    fn default() -> Self {
        Self::new(0)
    }
}
