//! Occupancy accounting for the bridge deck.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks how many vehicles are on the bridge, plus the high-water mark.
///
/// The peak never resets; strategies that admit correctly keep it at one,
/// and a peak above one is direct evidence that opposing vehicles shared
/// the deck.
#[derive(Debug, Default)]
pub struct OccupancyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl OccupancyGauge {
    /// Create a gauge for an empty bridge.
    pub const fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Record a vehicle driving onto the deck. Returns the new occupancy.
    pub fn raise(&self) -> usize {
        let now = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::Relaxed);
        now
    }

    /// Record a vehicle driving off the deck. Returns the new occupancy.
    ///
    /// Every `lower` must be preceded by a matching `raise`.
    pub fn lower(&self) -> usize {
        let prev = self.current.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "occupancy lowered below zero");
        prev - 1
    }

    /// Get the current occupancy.
    pub fn current(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Get the highest occupancy ever observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}
