//! Crossing guards for RAII-style bridge occupancy.

use std::time::{Duration, Instant};

use crate::api::bridge::BridgeController;
use crate::lanes::Direction;

/// A guard representing one vehicle on the bridge.
///
/// Returned by a successful enter; dropping it performs the matching leave,
/// so the bridge is vacated on every exit path, including panics.
///
/// # Example
///
/// ```rust,no_run
/// use onelane::{BridgeController, Direction};
///
/// let bridge = BridgeController::with_defaults();
///
/// {
///     let _crossing = bridge.enter(Direction::Left).unwrap();
///     // on the bridge here
/// } // off the bridge here
/// ```
pub struct Crossing<'a> {
    bridge: &'a BridgeController,
    direction: Direction,
    waited: Duration,
    entered_at: Instant,
}

impl<'a> Crossing<'a> {
    pub(crate) fn new(bridge: &'a BridgeController, direction: Direction, waited: Duration) -> Self {
        Self {
            bridge,
            direction,
            waited,
            entered_at: Instant::now(),
        }
    }

    /// Which side this vehicle entered from.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// How long this vehicle waited at the bank.
    pub fn waited(&self) -> Duration {
        self.waited
    }

    /// How long this vehicle has occupied the deck so far.
    pub fn time_on_bridge(&self) -> Duration {
        self.entered_at.elapsed()
    }

    /// Leave the bridge now.
    ///
    /// Equivalent to dropping the guard; named for call sites where the
    /// departure should be visible.
    pub fn release(self) {}
}

impl std::fmt::Debug for Crossing<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossing")
            .field("direction", &self.direction)
            .field("waited", &self.waited)
            .finish_non_exhaustive()
    }
}

impl Drop for Crossing<'_> {
    fn drop(&mut self) {
        self.bridge
            .finish_crossing(self.direction, self.waited, self.entered_at.elapsed());
    }
}
