//! Synchronization primitives.
//!
//! Provides the cancellation token, the blocking semaphore the admission
//! strategies are built on, and thin wrappers over std or parking_lot
//! mutexes.

pub(crate) mod atomics;
pub(crate) mod mutex;

pub mod cancel;
pub mod semaphore;
