//! Bridge lifecycle events.
//!
//! Provides opt-in event callbacks for observing traffic with zero
//! overhead when disabled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::lanes::Direction;
use crate::sync::mutex::Mutex;

/// A bridge lifecycle event.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// A vehicle arrived at a bank and asked to enter.
    Approached {
        /// Which side the vehicle came from.
        direction: Direction,
    },
    /// A vehicle drove onto the deck.
    Entered {
        /// Which side the vehicle came from.
        direction: Direction,
        /// How long it waited at the bank.
        waited: Duration,
    },
    /// A vehicle drove off the deck.
    Left {
        /// Which side the vehicle came from.
        direction: Direction,
        /// How long it occupied the deck.
        held: Duration,
    },
    /// A wait was cancelled before the vehicle entered.
    WaitCancelled {
        /// Which side the vehicle came from.
        direction: Direction,
    },
    /// A vehicle was turned away by a closed bridge.
    Rejected {
        /// Which side the vehicle came from.
        direction: Direction,
    },
    /// The bridge was closed.
    Closed,
}

/// Callback type for bridge events.
pub type BridgeEventCallback = Box<dyn Fn(&BridgeEvent) + Send + Sync>;

/// Registry for bridge event callbacks.
pub struct EventHooks {
    /// Whether event emission is enabled.
    enabled: AtomicBool,
    /// Registered event callbacks.
    callbacks: Mutex<Vec<BridgeEventCallback>>,
}

impl EventHooks {
    pub(crate) fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Enable event emission.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Disable event emission.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Check if event emission is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Register an event callback.
    pub fn on_event<F>(&self, callback: F)
    where
        F: Fn(&BridgeEvent) + Send + Sync + 'static,
    {
        self.callbacks.lock().push(Box::new(callback));
    }

    /// Emit an event to all callbacks, if enabled.
    pub(crate) fn emit(&self, event: &BridgeEvent) {
        if !self.is_enabled() {
            return;
        }
        let callbacks = self.callbacks.lock();
        for callback in callbacks.iter() {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_disabled_hooks_emit_nothing() {
        let hooks = EventHooks::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        hooks.on_event(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        hooks.emit(&BridgeEvent::Closed);
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        hooks.enable();
        hooks.emit(&BridgeEvent::Closed);
        hooks.emit(&BridgeEvent::Approached {
            direction: Direction::Left,
        });
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
