//! Crossing journal for post-run inspection.
//!
//! Vehicle threads push completed crossings onto a lock-free queue; the
//! simulation drains it whenever convenient. Recording never blocks a
//! crossing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_queue::SegQueue;

use crate::lanes::Direction;

/// A completed crossing.
#[derive(Debug, Clone, Copy)]
pub struct CrossingRecord {
    /// Completion order across all directions (0-based).
    pub sequence: u64,
    /// Which side the vehicle entered from.
    pub direction: Direction,
    /// Time spent waiting to enter.
    pub waited: Duration,
    /// Time spent on the bridge.
    pub held: Duration,
}

/// Lock-free journal of completed crossings.
pub struct CrossingJournal {
    queue: SegQueue<CrossingRecord>,
    sequence: AtomicU64,
}

impl CrossingJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Record a completed crossing.
    pub fn record(&self, direction: Direction, waited: Duration, held: Duration) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.queue.push(CrossingRecord {
            sequence,
            direction,
            waited,
            held,
        });
    }

    /// Drain all pending records, oldest first.
    pub fn drain(&self) -> Vec<CrossingRecord> {
        let mut records = Vec::with_capacity(self.queue.len());
        while let Some(record) = self.queue.pop() {
            records.push(record);
        }
        records
    }

    /// Check if there are pending records.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get approximate number of pending records.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for CrossingJournal {
    fn default() -> Self {
        Self::new()
    }
}
