//! Single lock around the whole admission transaction.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::lanes::{Admission, Direction, EnterError, TryEnterError};
use crate::sync::cancel::CancelToken;
use crate::sync::semaphore::DEFAULT_CANCEL_POLL;

struct DeckState {
    occupancy: usize,
    peak: usize,
    closed: bool,
}

/// Admission through one mutex guarding the occupancy check and increment.
///
/// Waiters block on a condition variable that `leave` signals, so there is
/// no polling, and the check-and-admit step is a single critical section:
/// opposing vehicles can never both observe an empty deck. Occupancy stays
/// at or below one for every interleaving.
pub struct GatedLane {
    state: Mutex<DeckState>,
    vacated: Condvar,
    cancel_poll: Duration,
}

impl GatedLane {
    /// Create a lane with the default cancellation check interval.
    pub fn new() -> Self {
        Self::with_cancel_poll(DEFAULT_CANCEL_POLL)
    }

    /// Create a lane that re-checks cancellation at the given interval.
    pub fn with_cancel_poll(cancel_poll: Duration) -> Self {
        Self {
            state: Mutex::new(DeckState {
                occupancy: 0,
                peak: 0,
                closed: false,
            }),
            vacated: Condvar::new(),
            cancel_poll,
        }
    }
}

impl Default for GatedLane {
    fn default() -> Self {
        Self::new()
    }
}

impl Admission for GatedLane {
    fn enter(&self, _direction: Direction, cancel: &CancelToken) -> Result<(), EnterError> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.closed {
                return Err(EnterError::Closed);
            }
            if cancel.is_cancelled() {
                return Err(EnterError::Cancelled);
            }
            if state.occupancy == 0 {
                state.occupancy += 1;
                if state.occupancy > state.peak {
                    state.peak = state.occupancy;
                }
                return Ok(());
            }
            let (guard, _timed_out) = self
                .vacated
                .wait_timeout(state, self.cancel_poll)
                .unwrap();
            state = guard;
        }
    }

    fn try_enter(&self, _direction: Direction) -> Result<(), TryEnterError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(TryEnterError::Closed);
        }
        if state.occupancy > 0 {
            return Err(TryEnterError::Occupied);
        }
        state.occupancy += 1;
        if state.occupancy > state.peak {
            state.peak = state.occupancy;
        }
        Ok(())
    }

    fn leave(&self, _direction: Direction) {
        {
            let mut state = self.state.lock().unwrap();
            debug_assert!(state.occupancy > 0, "leave without a matching enter");
            state.occupancy -= 1;
        }
        // One departure admits one waiter.
        self.vacated.notify_one();
    }

    fn occupancy(&self) -> usize {
        self.state.lock().unwrap().occupancy
    }

    fn peak_occupancy(&self) -> usize {
        self.state.lock().unwrap().peak
    }

    fn close(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.closed = true;
        }
        self.vacated.notify_all();
    }

    fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_leave_admits_one_waiter() {
        let lane = Arc::new(GatedLane::new());
        let token = CancelToken::new();

        lane.enter(Direction::Left, &token).unwrap();

        let (tx, rx) = mpsc::channel();
        let lane2 = Arc::clone(&lane);
        let waiter = thread::spawn(move || {
            let token = CancelToken::new();
            lane2.enter(Direction::Right, &token).unwrap();
            tx.send(()).unwrap();
            lane2.leave(Direction::Right);
        });

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        lane.leave(Direction::Left);
        rx.recv_timeout(Duration::from_secs(5))
            .expect("waiter should be admitted after the leave");
        waiter.join().unwrap();

        assert_eq!(lane.occupancy(), 0);
        assert_eq!(lane.peak_occupancy(), 1);
    }

    #[test]
    fn test_cancel_leaves_no_state_behind() {
        let lane = Arc::new(GatedLane::new());
        let holder = CancelToken::new();
        lane.enter(Direction::Left, &holder).unwrap();

        let token = CancelToken::new();
        let waiter_token = token.clone();
        let lane2 = Arc::clone(&lane);
        let waiter = thread::spawn(move || lane2.enter(Direction::Right, &waiter_token));

        thread::sleep(Duration::from_millis(20));
        token.cancel();
        assert_eq!(waiter.join().unwrap(), Err(EnterError::Cancelled));

        assert_eq!(lane.occupancy(), 1);
        lane.leave(Direction::Left);
        assert_eq!(lane.occupancy(), 0);

        // The lane still admits normally after the cancelled wait.
        let fresh = CancelToken::new();
        lane.enter(Direction::Right, &fresh).unwrap();
        lane.leave(Direction::Right);
    }

    #[test]
    fn test_close_rejects_and_wakes() {
        let lane = Arc::new(GatedLane::new());
        let holder = CancelToken::new();
        lane.enter(Direction::Left, &holder).unwrap();

        let lane2 = Arc::clone(&lane);
        let waiter = thread::spawn(move || {
            let token = CancelToken::new();
            lane2.enter(Direction::Right, &token)
        });

        thread::sleep(Duration::from_millis(20));
        lane.close();

        assert_eq!(waiter.join().unwrap(), Err(EnterError::Closed));
        assert_eq!(
            lane.try_enter(Direction::Left),
            Err(TryEnterError::Closed)
        );
    }
}
