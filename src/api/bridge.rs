//! The main bridge controller type.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::config::{AdmissionMode, BridgeConfig};
use crate::api::crossing::Crossing;
use crate::api::events::{BridgeEvent, EventHooks};
use crate::api::stats::{BridgeStats, StatsRegistry};
use crate::core::journal::{CrossingJournal, CrossingRecord};
use crate::lanes::{
    Admission, ArbitratedLane, Direction, EnterError, GatedLane, SharedLane, SplitLane,
    TryEnterError,
};
use crate::sync::cancel::CancelToken;

/// The main bridge controller type.
///
/// This is the primary entry point for all crossing operations.
/// It is cheap to clone (internally uses `Arc`) and thread-safe.
///
/// # Example
///
/// ```rust,no_run
/// use onelane::{BridgeController, BridgeConfig, Direction};
///
/// let bridge = BridgeController::new(BridgeConfig::default());
///
/// let crossing = bridge.enter(Direction::Left).unwrap();
/// // drive across...
/// drop(crossing);
/// ```
#[derive(Clone)]
pub struct BridgeController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    lane: Box<dyn Admission>,
    stats: StatsRegistry,
    hooks: EventHooks,
    journal: Option<CrossingJournal>,
    /// Token passed for plain `enter` calls; never cancelled.
    no_cancel: CancelToken,
}

impl BridgeController {
    /// Create a new controller with the given configuration.
    pub fn new(config: BridgeConfig) -> Self {
        let lane: Box<dyn Admission> = match config.admission {
            AdmissionMode::Shared => {
                Box::new(SharedLane::with_cancel_poll(config.cancel_check_interval))
            }
            AdmissionMode::Split => Box::new(SplitLane::with_intervals(
                config.poll_interval,
                config.cancel_check_interval,
            )),
            AdmissionMode::Gated => {
                Box::new(GatedLane::with_cancel_poll(config.cancel_check_interval))
            }
            AdmissionMode::Arbitrated => Box::new(ArbitratedLane::with_poll(config.poll_interval)),
        };
        Self {
            inner: Arc::new(ControllerInner {
                lane,
                stats: StatsRegistry::default(),
                hooks: EventHooks::new(),
                journal: config.record_crossings.then(CrossingJournal::new),
                no_cancel: CancelToken::new(),
            }),
        }
    }

    /// Create a controller with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(BridgeConfig::default())
    }

    /// Enter the bridge, blocking until it is safe to do so.
    ///
    /// The returned [`Crossing`] performs the matching leave when dropped.
    pub fn enter(&self, direction: Direction) -> Result<Crossing<'_>, EnterError> {
        self.enter_with_token(direction, &self.inner.no_cancel)
    }

    /// Enter from the left bank.
    pub fn enter_left(&self) -> Result<Crossing<'_>, EnterError> {
        self.enter(Direction::Left)
    }

    /// Enter from the right bank.
    pub fn enter_right(&self) -> Result<Crossing<'_>, EnterError> {
        self.enter(Direction::Right)
    }

    /// Enter the bridge, giving up when the token is cancelled.
    ///
    /// On [`EnterError::Cancelled`] the vehicle never occupied the bridge
    /// and nothing is left to release.
    pub fn enter_with_token(
        &self,
        direction: Direction,
        cancel: &CancelToken,
    ) -> Result<Crossing<'_>, EnterError> {
        let approached = Instant::now();
        self.inner.hooks.emit(&BridgeEvent::Approached { direction });

        match self.inner.lane.enter(direction, cancel) {
            Ok(()) => {
                let waited = approached.elapsed();
                self.inner.stats.record_enter(direction, waited);
                self.inner
                    .hooks
                    .emit(&BridgeEvent::Entered { direction, waited });
                Ok(Crossing::new(self, direction, waited))
            }
            Err(EnterError::Cancelled) => {
                self.inner.stats.record_cancelled();
                self.inner
                    .hooks
                    .emit(&BridgeEvent::WaitCancelled { direction });
                Err(EnterError::Cancelled)
            }
            Err(EnterError::Closed) => {
                self.inner.stats.record_closed_rejection();
                self.inner.hooks.emit(&BridgeEvent::Rejected { direction });
                Err(EnterError::Closed)
            }
        }
    }

    /// Enter the bridge without waiting for other traffic.
    pub fn try_enter(&self, direction: Direction) -> Result<Crossing<'_>, TryEnterError> {
        match self.inner.lane.try_enter(direction) {
            Ok(()) => {
                self.inner.stats.record_enter(direction, Duration::ZERO);
                self.inner.hooks.emit(&BridgeEvent::Entered {
                    direction,
                    waited: Duration::ZERO,
                });
                Ok(Crossing::new(self, direction, Duration::ZERO))
            }
            Err(TryEnterError::Occupied) => Err(TryEnterError::Occupied),
            Err(TryEnterError::Closed) => {
                self.inner.stats.record_closed_rejection();
                self.inner.hooks.emit(&BridgeEvent::Rejected { direction });
                Err(TryEnterError::Closed)
            }
        }
    }

    /// Number of vehicles on the bridge right now.
    pub fn occupancy(&self) -> usize {
        self.inner.lane.occupancy()
    }

    /// Highest occupancy the bridge has ever seen.
    pub fn peak_occupancy(&self) -> usize {
        self.inner.lane.peak_occupancy()
    }

    /// Close the bridge: wake all waiters with an error, reject new traffic.
    ///
    /// Vehicles already on the deck finish their crossing normally.
    pub fn close(&self) {
        self.inner.lane.close();
        self.inner.hooks.emit(&BridgeEvent::Closed);
        #[cfg(feature = "log")]
        log::debug!("bridge closed");
    }

    /// Check whether the bridge has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lane.is_closed()
    }

    /// Get current crossing statistics.
    pub fn stats(&self) -> BridgeStats {
        self.inner
            .stats
            .snapshot(self.inner.lane.occupancy(), self.inner.lane.peak_occupancy())
    }

    /// Access the event hooks to register callbacks and enable emission.
    pub fn hooks(&self) -> &EventHooks {
        &self.inner.hooks
    }

    /// Check whether completed crossings are being journaled.
    pub fn records_crossings(&self) -> bool {
        self.inner.journal.is_some()
    }

    /// Drain the crossing journal, oldest record first.
    ///
    /// Returns an empty vec when recording is disabled.
    pub fn take_journal(&self) -> Vec<CrossingRecord> {
        self.inner
            .journal
            .as_ref()
            .map(CrossingJournal::drain)
            .unwrap_or_default()
    }

    pub(crate) fn finish_crossing(&self, direction: Direction, waited: Duration, held: Duration) {
        self.inner.lane.leave(direction);
        if let Some(journal) = &self.inner.journal {
            journal.record(direction, waited, held);
        }
        self.inner.hooks.emit(&BridgeEvent::Left { direction, held });
    }
}
