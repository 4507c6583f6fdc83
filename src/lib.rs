//! # onelane
//!
//! Mutual-exclusion traffic coordination for one-lane bridge simulations.
//!
//! A one-lane bridge carries vehicles from two banks, and at most one
//! vehicle may occupy the deck at a time. Each vehicle is a thread calling
//! paired enter/leave operations; this crate provides the coordination in
//! four named admission strategies so their behavior can be compared:
//!
//! - `Shared`: one lock for the whole bridge (simplest, correct)
//! - `Split`: one gate per direction over a polled counter, keeping the
//!   classic cross-direction admission window for study
//! - `Gated`: one mutex around the whole check-and-admit transaction
//! - `Arbitrated`: a dedicated arbiter thread granting one crossing at a time
//!
//! ## Features
//!
//! - RAII crossing guards (leave on every exit path)
//! - Cancellation as an explicit result (`CancelToken` + `EnterError::Cancelled`)
//! - Orderly shutdown (`close` wakes all waiters)
//! - Crossing statistics and peak-occupancy tracking
//! - Optional lock-free crossing journal
//! - Opt-in lifecycle event callbacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use onelane::{BridgeController, BridgeConfig, Direction};
//!
//! let bridge = BridgeController::new(BridgeConfig::default());
//!
//! let crossing = bridge.enter(Direction::Left).unwrap();
//! // drive across...
//! drop(crossing); // leaves the bridge
//! ```

#[allow(dead_code)]
pub mod api;

#[allow(dead_code)]
mod core;
mod lanes;
#[allow(dead_code)]
mod sync;

// Re-export public API at crate root for convenience
pub use api::bridge::BridgeController;
pub use api::config::{AdmissionMode, BridgeConfig};
pub use api::crossing::Crossing;
pub use api::events::{BridgeEvent, BridgeEventCallback, EventHooks};
pub use api::stats::BridgeStats;

// Admission strategies and their vocabulary
pub use lanes::{
    Admission, ArbitratedLane, Direction, EnterError, GatedLane, SharedLane, SplitLane,
    TryEnterError,
};

// Crossing journal
pub use crate::core::journal::CrossingRecord;

// Underlying primitives, for building custom strategies
pub use sync::cancel::CancelToken;
pub use sync::semaphore::{AcquireError, Semaphore, TryAcquireError};
