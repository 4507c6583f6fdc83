//! Cancellation tokens for waiting vehicles.
//!
//! A token is a cloneable flag shared between the thread that waits to
//! enter the bridge and whoever may call the wait off. Strategies re-check
//! the token while blocked, so a cancelled wait returns within one
//! `cancel_check_interval` without having acquired anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag.
///
/// All clones observe the same flag. Cancelling is one-way; tokens are
/// cheap enough to create one per crossing attempt.
///
/// # Example
///
/// ```ignore
/// let token = CancelToken::new();
/// let waiter = token.clone();
/// // elsewhere:
/// token.cancel();
/// assert!(waiter.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the wait observing this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
