//! Per-direction gates over a polled shared counter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::core::occupancy::OccupancyGauge;
use crate::lanes::{warn_shared_deck, Admission, Direction, EnterError, TryEnterError};
use crate::sync::cancel::CancelToken;
use crate::sync::semaphore::Semaphore;

/// Default interval for polling the occupancy counter.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Admission through one gate per direction plus a polled occupancy counter.
///
/// `enter` takes the direction's single-permit gate, then polls until the
/// shared counter reads zero before stepping onto the deck. Traffic within
/// a direction is serialized by its gate.
///
/// The occupancy check and the step onto the deck are separate operations
/// under different gates, so vehicles from opposing directions can both read
/// an empty deck and enter together. The counter itself is atomic, which
/// keeps the overlap observable (`peak_occupancy` above one) instead of
/// corrupting it. [`GatedLane`](crate::GatedLane) performs the same
/// admission under a single lock and does not have this window.
pub struct SplitLane {
    gates: [Semaphore; 2],
    occupancy: OccupancyGauge,
    poll: Duration,
    closed: AtomicBool,
}

impl SplitLane {
    /// Create a lane with the default polling interval.
    pub fn new() -> Self {
        Self::with_intervals(DEFAULT_POLL_INTERVAL, crate::sync::semaphore::DEFAULT_CANCEL_POLL)
    }

    /// Create a lane with explicit polling and cancellation check intervals.
    ///
    /// A zero `poll` degenerates to a yield-tight spin; useful for making
    /// the cross-direction admission window easy to hit in stress runs.
    pub fn with_intervals(poll: Duration, cancel_poll: Duration) -> Self {
        Self {
            gates: [
                Semaphore::with_cancel_poll(1, cancel_poll),
                Semaphore::with_cancel_poll(1, cancel_poll),
            ],
            occupancy: OccupancyGauge::new(),
            poll,
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for SplitLane {
    fn default() -> Self {
        Self::new()
    }
}

impl Admission for SplitLane {
    fn enter(&self, direction: Direction, cancel: &CancelToken) -> Result<(), EnterError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(EnterError::Closed);
        }

        let gate = &self.gates[direction.index()];
        gate.acquire(cancel)?;

        // Poll until the deck looks empty. The gate stays held the whole
        // time, so a cancelled or closed wait must hand it back.
        while self.occupancy.current() > 0 {
            if cancel.is_cancelled() {
                gate.release();
                return Err(EnterError::Cancelled);
            }
            if self.closed.load(Ordering::Acquire) {
                gate.release();
                return Err(EnterError::Closed);
            }
            thread::sleep(self.poll);
        }

        // The opposing gate runs the same check; both sides can pass it
        // before either increment lands.
        let occupied = self.occupancy.raise();
        if occupied > 1 {
            warn_shared_deck(occupied);
        }
        Ok(())
    }

    fn try_enter(&self, direction: Direction) -> Result<(), TryEnterError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TryEnterError::Closed);
        }

        let gate = &self.gates[direction.index()];
        gate.try_acquire().map_err(|_| TryEnterError::Occupied)?;

        if self.occupancy.current() > 0 {
            gate.release();
            return Err(TryEnterError::Occupied);
        }

        let occupied = self.occupancy.raise();
        if occupied > 1 {
            warn_shared_deck(occupied);
        }
        Ok(())
    }

    fn leave(&self, direction: Direction) {
        self.occupancy.lower();
        self.gates[direction.index()].release();
    }

    fn occupancy(&self) -> usize {
        self.occupancy.current()
    }

    fn peak_occupancy(&self) -> usize {
        self.occupancy.peak()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        for gate in &self.gates {
            gate.close();
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;

    #[test]
    fn test_same_direction_serializes_on_the_gate() {
        let lane = Arc::new(SplitLane::new());
        let token = CancelToken::new();

        lane.enter(Direction::Left, &token).unwrap();

        let (tx, rx) = mpsc::channel();
        let lane2 = Arc::clone(&lane);
        let follower = thread::spawn(move || {
            let token = CancelToken::new();
            lane2.enter(Direction::Left, &token).unwrap();
            tx.send(()).unwrap();
            lane2.leave(Direction::Left);
        });

        // The second left-bank vehicle is held at the left gate.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        lane.leave(Direction::Left);
        rx.recv_timeout(Duration::from_secs(5))
            .expect("follower should cross after the leave");
        follower.join().unwrap();
    }

    #[test]
    fn test_cancelled_poll_returns_the_gate() {
        let lane = Arc::new(SplitLane::new());
        let holder = CancelToken::new();

        // Occupy the deck from the right so a left-bank vehicle polls.
        lane.enter(Direction::Right, &holder).unwrap();

        let token = CancelToken::new();
        let waiter_token = token.clone();
        let lane2 = Arc::clone(&lane);
        let waiter = thread::spawn(move || lane2.enter(Direction::Left, &waiter_token));

        thread::sleep(Duration::from_millis(20));
        token.cancel();
        assert_eq!(waiter.join().unwrap(), Err(EnterError::Cancelled));

        // The left gate must be free again for the next vehicle.
        lane.leave(Direction::Right);
        let fresh = CancelToken::new();
        lane.enter(Direction::Left, &fresh).unwrap();
        lane.leave(Direction::Left);
        assert_eq!(lane.occupancy(), 0);
    }
}
