//! Single shared lock for the whole bridge.

use std::time::Duration;

use crate::core::occupancy::OccupancyGauge;
use crate::lanes::{Admission, Direction, EnterError, TryEnterError};
use crate::sync::cancel::CancelToken;
use crate::sync::semaphore::Semaphore;

/// Admission through one single-permit semaphore shared by both directions.
///
/// At most one vehicle is on the bridge at any time, regardless of
/// direction; a waiter from either side proceeds when the holder leaves.
/// Direction plays no role in admission, so same-direction traffic is
/// serialized too.
pub struct SharedLane {
    deck: Semaphore,
    occupancy: OccupancyGauge,
}

impl SharedLane {
    /// Create a lane with the default cancellation check interval.
    pub fn new() -> Self {
        Self {
            deck: Semaphore::new(1),
            occupancy: OccupancyGauge::new(),
        }
    }

    /// Create a lane that re-checks cancellation at the given interval.
    pub fn with_cancel_poll(cancel_poll: Duration) -> Self {
        Self {
            deck: Semaphore::with_cancel_poll(1, cancel_poll),
            occupancy: OccupancyGauge::new(),
        }
    }
}

impl Default for SharedLane {
    fn default() -> Self {
        Self::new()
    }
}

impl Admission for SharedLane {
    fn enter(&self, _direction: Direction, cancel: &CancelToken) -> Result<(), EnterError> {
        self.deck.acquire(cancel)?;
        self.occupancy.raise();
        Ok(())
    }

    fn try_enter(&self, _direction: Direction) -> Result<(), TryEnterError> {
        if self.deck.is_closed() {
            return Err(TryEnterError::Closed);
        }
        self.deck
            .try_acquire()
            .map_err(|_| TryEnterError::Occupied)?;
        self.occupancy.raise();
        Ok(())
    }

    fn leave(&self, _direction: Direction) {
        self.occupancy.lower();
        self.deck.release();
    }

    fn occupancy(&self) -> usize {
        self.occupancy.current()
    }

    fn peak_occupancy(&self) -> usize {
        self.occupancy.peak()
    }

    fn close(&self) {
        self.deck.close();
    }

    fn is_closed(&self) -> bool {
        self.deck.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_opposing_vehicles_serialize() {
        let lane = Arc::new(SharedLane::new());
        let token = CancelToken::new();

        lane.enter(Direction::Left, &token).unwrap();
        assert_eq!(lane.occupancy(), 1);

        let (tx, rx) = mpsc::channel();
        let lane2 = Arc::clone(&lane);
        let opposing = thread::spawn(move || {
            let token = CancelToken::new();
            lane2.enter(Direction::Right, &token).unwrap();
            tx.send(()).unwrap();
            lane2.leave(Direction::Right);
        });

        // The right-bank vehicle must wait while the left one is crossing.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        lane.leave(Direction::Left);
        rx.recv_timeout(Duration::from_secs(5))
            .expect("opposing vehicle should cross after the leave");
        opposing.join().unwrap();

        assert_eq!(lane.occupancy(), 0);
        assert_eq!(lane.peak_occupancy(), 1);
    }

    #[test]
    fn test_try_enter_reports_occupied() {
        let lane = SharedLane::new();
        let token = CancelToken::new();

        lane.enter(Direction::Left, &token).unwrap();
        assert_eq!(
            lane.try_enter(Direction::Right),
            Err(TryEnterError::Occupied)
        );
        // Same direction is refused as well; the deck fits one vehicle.
        assert_eq!(
            lane.try_enter(Direction::Left),
            Err(TryEnterError::Occupied)
        );

        lane.leave(Direction::Left);
        assert!(lane.try_enter(Direction::Right).is_ok());
        lane.leave(Direction::Right);
    }
}
