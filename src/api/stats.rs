//! Crossing statistics.

use std::time::Duration;

use crate::lanes::Direction;
use crate::sync::atomics::{AtomicCounter, AtomicMax};

/// Aggregated crossing statistics.
#[derive(Debug, Clone, Default)]
pub struct BridgeStats {
    /// Completed entries from the left bank.
    pub crossings_left: u64,

    /// Completed entries from the right bank.
    pub crossings_right: u64,

    /// Waits cancelled before the vehicle entered.
    pub cancelled_waits: u64,

    /// Vehicles turned away by a closed bridge.
    pub closed_rejections: u64,

    /// Total time vehicles spent waiting to enter (microseconds).
    pub total_wait_us: u64,

    /// Longest single wait (microseconds).
    pub max_wait_us: u64,

    /// Vehicles on the bridge right now.
    pub current_occupancy: usize,

    /// Highest occupancy ever observed.
    pub peak_occupancy: usize,
}

impl BridgeStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries across both directions.
    pub fn total_crossings(&self) -> u64 {
        self.crossings_left + self.crossings_right
    }

    /// Mean wait per entry (microseconds).
    pub fn mean_wait_us(&self) -> f64 {
        let total = self.total_crossings();
        if total == 0 {
            return 0.0;
        }
        self.total_wait_us as f64 / total as f64
    }
}

impl std::fmt::Display for BridgeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bridge Statistics:")?;
        writeln!(f, "  Crossings (left):  {}", self.crossings_left)?;
        writeln!(f, "  Crossings (right): {}", self.crossings_right)?;
        writeln!(f, "  Cancelled waits:   {}", self.cancelled_waits)?;
        writeln!(f, "  Closed rejections: {}", self.closed_rejections)?;
        writeln!(f, "  Total wait:        {} us", self.total_wait_us)?;
        writeln!(f, "  Max wait:          {} us", self.max_wait_us)?;
        writeln!(f, "  Mean wait:         {:.1} us", self.mean_wait_us())?;
        writeln!(f, "  Occupancy now:     {}", self.current_occupancy)?;
        writeln!(f, "  Occupancy peak:    {}", self.peak_occupancy)?;
        Ok(())
    }
}

/// Atomic counters behind the controller (aggregated into snapshots).
#[derive(Default)]
pub(crate) struct StatsRegistry {
    crossings: [AtomicCounter; 2],
    cancelled_waits: AtomicCounter,
    closed_rejections: AtomicCounter,
    total_wait_us: AtomicCounter,
    max_wait_us: AtomicMax,
}

impl StatsRegistry {
    pub fn record_enter(&self, direction: Direction, waited: Duration) {
        let waited_us = waited.as_micros() as u64;
        self.crossings[direction.index()].increment();
        self.total_wait_us.add(waited_us);
        self.max_wait_us.record(waited_us);
    }

    pub fn record_cancelled(&self) {
        self.cancelled_waits.increment();
    }

    pub fn record_closed_rejection(&self) {
        self.closed_rejections.increment();
    }

    pub fn snapshot(&self, current_occupancy: usize, peak_occupancy: usize) -> BridgeStats {
        BridgeStats {
            crossings_left: self.crossings[Direction::Left.index()].get(),
            crossings_right: self.crossings[Direction::Right.index()].get(),
            cancelled_waits: self.cancelled_waits.get(),
            closed_rejections: self.closed_rejections.get(),
            total_wait_us: self.total_wait_us.get(),
            max_wait_us: self.max_wait_us.get(),
            current_occupancy,
            peak_occupancy,
        }
    }
}
