//! Blocking counting semaphore with cancellation and close.
//!
//! Admission strategies gate entry on single-permit instances of this
//! semaphore. Waiting threads block on a condition variable; timed waits
//! bound how long a cancelled or closed waiter keeps sleeping.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::sync::cancel::CancelToken;

/// How often a blocked `acquire` re-checks its cancellation token.
pub const DEFAULT_CANCEL_POLL: Duration = Duration::from_millis(5);

/// Error returned when a blocking acquire fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// Cancelled while waiting for a permit.
    Cancelled,
    /// The semaphore was closed.
    Closed,
}

impl std::fmt::Display for AcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "semaphore acquire cancelled"),
            Self::Closed => write!(f, "semaphore closed"),
        }
    }
}

impl std::error::Error for AcquireError {}

/// Error returned when a non-blocking acquire finds no permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryAcquireError;

impl std::fmt::Display for TryAcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no semaphore permits available")
    }
}

impl std::error::Error for TryAcquireError {}

struct SemState {
    permits: usize,
    closed: bool,
}

/// A blocking counting semaphore.
///
/// `acquire` takes a permit or blocks until one is released; `release`
/// returns a permit and wakes at most one waiter. Closing wakes every
/// waiter with [`AcquireError::Closed`] and rejects later acquires.
///
/// A permit taken before cancellation or close is unaffected; only waiters
/// are turned away.
pub struct Semaphore {
    state: Mutex<SemState>,
    available: Condvar,
    cancel_poll: Duration,
}

impl Semaphore {
    /// Create a new semaphore with the given number of permits.
    pub fn new(permits: usize) -> Self {
        Self::with_cancel_poll(permits, DEFAULT_CANCEL_POLL)
    }

    /// Create a semaphore that re-checks cancellation at the given interval.
    pub fn with_cancel_poll(permits: usize, cancel_poll: Duration) -> Self {
        Self {
            state: Mutex::new(SemState {
                permits,
                closed: false,
            }),
            available: Condvar::new(),
            cancel_poll,
        }
    }

    /// Take a permit, blocking until one is available.
    ///
    /// Returns an error without having taken a permit if the token is
    /// cancelled or the semaphore is closed while waiting.
    pub fn acquire(&self, cancel: &CancelToken) -> Result<(), AcquireError> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.closed {
                return Err(AcquireError::Closed);
            }
            if cancel.is_cancelled() {
                return Err(AcquireError::Cancelled);
            }
            if state.permits > 0 {
                state.permits -= 1;
                return Ok(());
            }
            // Timed wait: release notifications wake us early, the timeout
            // bounds how long a cancelled waiter sleeps.
            let (guard, _timed_out) = self
                .available
                .wait_timeout(state, self.cancel_poll)
                .unwrap();
            state = guard;
        }
    }

    /// Take a permit without blocking.
    pub fn try_acquire(&self) -> Result<(), TryAcquireError> {
        let mut state = self.state.lock().unwrap();
        if state.closed || state.permits == 0 {
            return Err(TryAcquireError);
        }
        state.permits -= 1;
        Ok(())
    }

    /// Return a permit and wake at most one waiter.
    pub fn release(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.permits += 1;
        }
        // Notify outside the lock so the woken thread can take it directly.
        self.available.notify_one();
    }

    /// Close the semaphore, waking all waiters with an error.
    pub fn close(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.closed = true;
        }
        self.available.notify_all();
    }

    /// Check whether the semaphore has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    /// Get the number of currently available permits.
    pub fn available_permits(&self) -> usize {
        self.state.lock().unwrap().permits
    }
}
