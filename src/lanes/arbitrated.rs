//! Arbiter-thread admission via a request/respond handshake.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::core::occupancy::OccupancyGauge;
use crate::lanes::{Admission, Direction, EnterError, TryEnterError};
use crate::sync::cancel::CancelToken;

use super::split::DEFAULT_POLL_INTERVAL;

/// Shared words between vehicles and the arbiter.
///
/// `request` holds the ticket of the vehicle asking to cross (zero when the
/// slot is free); `respond` holds the ticket currently granted the deck.
struct ArbiterShared {
    request: AtomicU64,
    respond: AtomicU64,
    closed: AtomicBool,
}

/// Admission granted by a dedicated arbiter thread.
///
/// Each vehicle posts a unique ticket into the shared `request` word and
/// waits for the arbiter to publish it in `respond`; leaving clears the
/// grant, and only then does the arbiter serve the next ticket. One grant
/// exists at a time, so occupancy never exceeds one.
///
/// The arbiter runs until [`close`](Admission::close) (or drop) and is
/// joined there.
pub struct ArbitratedLane {
    shared: Arc<ArbiterShared>,
    arbiter: Mutex<Option<JoinHandle<()>>>,
    occupancy: OccupancyGauge,
    next_ticket: AtomicU64,
    poll: Duration,
}

impl ArbitratedLane {
    /// Create a lane with the default polling interval.
    pub fn new() -> Self {
        Self::with_poll(DEFAULT_POLL_INTERVAL)
    }

    /// Create a lane whose handshake polls at the given interval.
    pub fn with_poll(poll: Duration) -> Self {
        let shared = Arc::new(ArbiterShared {
            request: AtomicU64::new(0),
            respond: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        });
        let arbiter_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("onelane-arbiter".into())
            .spawn(move || arbiter_loop(&arbiter_shared, poll))
            .expect("failed to spawn arbiter thread");
        Self {
            shared,
            arbiter: Mutex::new(Some(handle)),
            occupancy: OccupancyGauge::new(),
            next_ticket: AtomicU64::new(1),
            poll,
        }
    }

    fn take_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::Relaxed)
    }

    /// Back out of a pending request.
    ///
    /// Once a ticket is posted, only the arbiter removes it. If our removal
    /// loses that race, a grant for the ticket is already on its way: take
    /// it and hand it straight back so the arbiter can serve the next
    /// vehicle.
    fn withdraw(&self, posted: bool, ticket: u64) {
        if !posted {
            return;
        }
        if self
            .shared
            .request
            .compare_exchange(ticket, 0, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            return;
        }
        loop {
            if self
                .shared
                .respond
                .compare_exchange(ticket, 0, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
            thread::sleep(self.poll);
        }
    }
}

impl Default for ArbitratedLane {
    fn default() -> Self {
        Self::new()
    }
}

fn arbiter_loop(shared: &ArbiterShared, poll: Duration) {
    loop {
        // Wait for a ticket to be posted.
        loop {
            if shared.closed.load(Ordering::Acquire) {
                return;
            }
            if shared.request.load(Ordering::Acquire) != 0 {
                break;
            }
            thread::sleep(poll);
        }

        // Claim the posted ticket. A vehicle withdrawing at this moment can
        // win the word back, in which case there is nothing to serve.
        let ticket = shared.request.swap(0, Ordering::AcqRel);
        if ticket == 0 {
            continue;
        }

        // Publish the grant, then wait for the crossing to finish.
        shared.respond.store(ticket, Ordering::Release);
        while shared.respond.load(Ordering::Acquire) != 0 {
            if shared.closed.load(Ordering::Acquire) {
                return;
            }
            thread::sleep(poll);
        }
    }
}

impl Admission for ArbitratedLane {
    fn enter(&self, _direction: Direction, cancel: &CancelToken) -> Result<(), EnterError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(EnterError::Closed);
        }

        let ticket = self.take_ticket();
        let mut posted = false;
        loop {
            if self.shared.respond.load(Ordering::Acquire) == ticket {
                break;
            }
            if cancel.is_cancelled() {
                self.withdraw(posted, ticket);
                return Err(EnterError::Cancelled);
            }
            if self.shared.closed.load(Ordering::Acquire) {
                self.withdraw(posted, ticket);
                return Err(EnterError::Closed);
            }
            if !posted {
                posted = self
                    .shared
                    .request
                    .compare_exchange(0, ticket, Ordering::AcqRel, Ordering::Relaxed)
                    .is_ok();
            }
            thread::sleep(self.poll);
        }

        self.occupancy.raise();
        Ok(())
    }

    fn try_enter(&self, _direction: Direction) -> Result<(), TryEnterError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(TryEnterError::Closed);
        }
        if self.shared.respond.load(Ordering::Acquire) != 0 {
            return Err(TryEnterError::Occupied);
        }

        // The handshake needs the arbiter to answer, so "without waiting"
        // still spans a few polling intervals before reporting the deck busy.
        let ticket = self.take_ticket();
        if self
            .shared
            .request
            .compare_exchange(0, ticket, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            return Err(TryEnterError::Occupied);
        }
        for _ in 0..4 {
            if self.shared.respond.load(Ordering::Acquire) == ticket {
                self.occupancy.raise();
                return Ok(());
            }
            thread::sleep(self.poll);
        }
        self.withdraw(true, ticket);
        Err(TryEnterError::Occupied)
    }

    fn leave(&self, _direction: Direction) {
        self.occupancy.lower();
        self.shared.respond.store(0, Ordering::Release);
    }

    fn occupancy(&self) -> usize {
        self.occupancy.current()
    }

    fn peak_occupancy(&self) -> usize {
        self.occupancy.peak()
    }

    fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
        if let Some(handle) = self.arbiter.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

impl Drop for ArbitratedLane {
    fn drop(&mut self) {
        self.close();
    }
}
