//! Controller configuration.

use std::time::Duration;

/// Which admission strategy the controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionMode {
    /// One shared lock for the whole bridge.
    Shared,
    /// One gate per direction over a polled counter.
    ///
    /// Keeps the classic cross-direction admission window; see
    /// [`SplitLane`](crate::SplitLane).
    Split,
    /// One mutex around the whole check-and-admit transaction.
    Gated,
    /// A dedicated arbiter thread granting one crossing at a time.
    Arbitrated,
}

impl Default for AdmissionMode {
    fn default() -> Self {
        Self::Shared
    }
}

/// Configuration for the bridge controller.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Admission strategy (default: one shared lock)
    pub admission: AdmissionMode,

    /// Polling interval for the split and arbitrated strategies
    pub poll_interval: Duration,

    /// How often blocked waits re-check their cancellation token
    pub cancel_check_interval: Duration,

    /// Record completed crossings in the drainable journal
    pub record_crossings: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            admission: AdmissionMode::default(),
            poll_interval: Duration::from_micros(100),
            cancel_check_interval: Duration::from_millis(5),
            record_crossings: false,
        }
    }
}

impl BridgeConfig {
    /// Create a config that makes the split strategy's admission window
    /// easy to hit: split admission, a spin-tight poll, and the journal on.
    pub fn stress() -> Self {
        Self {
            admission: AdmissionMode::Split,
            poll_interval: Duration::ZERO,
            cancel_check_interval: Duration::from_millis(1),
            record_crossings: true,
        }
    }

    /// Builder pattern: set the admission strategy.
    pub fn with_admission(mut self, admission: AdmissionMode) -> Self {
        self.admission = admission;
        self
    }

    /// Builder pattern: set the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder pattern: set the cancellation check interval.
    pub fn with_cancel_check_interval(mut self, interval: Duration) -> Self {
        self.cancel_check_interval = interval;
        self
    }

    /// Builder pattern: enable or disable the crossing journal.
    pub fn with_recording(mut self, enable: bool) -> Self {
        self.record_crossings = enable;
        self
    }
}
