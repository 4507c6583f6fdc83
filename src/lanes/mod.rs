//! Admission strategies for the one-lane bridge.
//!
//! Each strategy decides when a vehicle may occupy the deck. They share one
//! trait so simulations can swap them and compare behavior: two are faithful
//! to the classic exercise ([`SharedLane`], [`SplitLane`]) and two close the
//! split lane's admission window ([`GatedLane`], [`ArbitratedLane`]).

mod arbitrated;
mod gated;
mod shared;
mod split;

pub use arbitrated::ArbitratedLane;
pub use gated::GatedLane;
pub use shared::SharedLane;
pub use split::SplitLane;

use crate::sync::cancel::CancelToken;
use crate::sync::semaphore::AcquireError;

/// Which end of the bridge a vehicle approaches from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Traffic entering from the left bank.
    Left,
    /// Traffic entering from the right bank.
    Right,
}

impl Direction {
    /// Get the opposing direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Error returned when a blocking enter does not grant the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterError {
    /// The wait was cancelled through its token.
    Cancelled,
    /// The bridge was closed.
    Closed,
}

impl std::fmt::Display for EnterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled while waiting to enter"),
            Self::Closed => write!(f, "bridge closed"),
        }
    }
}

impl std::error::Error for EnterError {}

impl From<AcquireError> for EnterError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Cancelled => Self::Cancelled,
            AcquireError::Closed => Self::Closed,
        }
    }
}

/// Error returned when a non-blocking enter does not grant the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryEnterError {
    /// The bridge is currently occupied or its gate is held.
    Occupied,
    /// The bridge was closed.
    Closed,
}

impl std::fmt::Display for TryEnterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Occupied => write!(f, "bridge occupied"),
            Self::Closed => write!(f, "bridge closed"),
        }
    }
}

impl std::error::Error for TryEnterError {}

/// An admission strategy for the one-lane bridge.
///
/// Implementations decide when `enter` may proceed; they do not queue or
/// order vehicles beyond what their locks provide.
pub trait Admission: Send + Sync {
    /// Block until the vehicle may occupy the bridge, then record it.
    ///
    /// On cancellation or close this returns an error with no residual
    /// state: occupancy untouched, no lock left held.
    fn enter(&self, direction: Direction, cancel: &CancelToken) -> Result<(), EnterError>;

    /// Enter without waiting for other traffic.
    fn try_enter(&self, direction: Direction) -> Result<(), TryEnterError>;

    /// Record the vehicle leaving and wake at most one waiter.
    ///
    /// Must be paired with a successful `enter` from the same thread;
    /// unmatched calls are not guarded.
    fn leave(&self, direction: Direction);

    /// Number of vehicles currently on the bridge.
    fn occupancy(&self) -> usize;

    /// Highest occupancy ever observed.
    fn peak_occupancy(&self) -> usize;

    /// Close the bridge: wake all waiters with an error, reject new entries.
    fn close(&self);

    /// Check whether the bridge has been closed.
    fn is_closed(&self) -> bool;
}

pub(crate) fn warn_shared_deck(occupied: usize) {
    #[cfg(feature = "log")]
    log::warn!("opposing traffic shared the bridge deck (occupancy {occupied})");
    #[cfg(not(feature = "log"))]
    let _ = occupied;
}
