//! Integration tests for onelane.

use onelane::{
    AdmissionMode, BridgeConfig, BridgeController, BridgeEvent, CancelToken, Direction,
    EnterError, TryEnterError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

#[test]
fn test_basic_crossing_roundtrip() {
    let bridge = BridgeController::with_defaults();

    let crossing = bridge.enter(Direction::Left).unwrap();
    assert_eq!(bridge.occupancy(), 1);
    assert_eq!(crossing.direction(), Direction::Left);
    crossing.release();

    assert_eq!(bridge.occupancy(), 0);
    assert_eq!(bridge.stats().total_crossings(), 1);
}

#[test]
fn test_opposing_vehicles_take_turns() {
    let bridge = BridgeController::with_defaults();

    let crossing = bridge.enter_left().unwrap();

    // The opposing vehicle must block while the deck is occupied.
    let (tx, rx) = mpsc::channel();
    let bridge2 = bridge.clone();
    let opposing = thread::spawn(move || {
        let crossing = bridge2.enter_right().unwrap();
        tx.send(()).unwrap();
        crossing.release();
    });

    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    assert_eq!(bridge.occupancy(), 1);

    crossing.release();
    rx.recv_timeout(Duration::from_secs(5))
        .expect("opposing vehicle should cross after the deck clears");
    opposing.join().unwrap();

    let stats = bridge.stats();
    assert_eq!(stats.crossings_left, 1);
    assert_eq!(stats.crossings_right, 1);
    assert_eq!(stats.peak_occupancy, 1);
}

#[test]
fn test_matched_pairs_return_occupancy_to_zero() {
    let bridge = BridgeController::with_defaults();

    for i in 0..16 {
        let direction = if i % 2 == 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        bridge.enter(direction).unwrap().release();
    }

    assert_eq!(bridge.occupancy(), 0);
    let stats = bridge.stats();
    assert_eq!(stats.crossings_left, 8);
    assert_eq!(stats.crossings_right, 8);
}

#[test]
fn test_try_enter_on_occupied_deck() {
    let bridge = BridgeController::with_defaults();

    let crossing = bridge.enter_left().unwrap();
    assert!(matches!(
        bridge.try_enter(Direction::Right),
        Err(TryEnterError::Occupied)
    ));

    crossing.release();
    let second = bridge.try_enter(Direction::Right).unwrap();
    second.release();
}

#[test]
fn test_cancelled_wait_grants_nothing() {
    let bridge = BridgeController::with_defaults();
    let crossing = bridge.enter_left().unwrap();

    let token = CancelToken::new();
    let waiter_token = token.clone();
    let bridge2 = bridge.clone();
    let waiter =
        thread::spawn(move || match bridge2.enter_with_token(Direction::Right, &waiter_token) {
            Ok(_) => panic!("cancelled wait must not enter"),
            Err(err) => err,
        });

    thread::sleep(Duration::from_millis(20));
    token.cancel();
    assert_eq!(waiter.join().unwrap(), EnterError::Cancelled);

    // Nothing was incremented and nothing is held by the cancelled thread.
    assert_eq!(bridge.occupancy(), 1);
    crossing.release();
    assert_eq!(bridge.occupancy(), 0);
    assert_eq!(bridge.stats().cancelled_waits, 1);

    // The bridge is fully usable afterwards.
    bridge.enter_right().unwrap().release();
}

#[test]
fn test_close_wakes_waiters_and_rejects() {
    let bridge = BridgeController::with_defaults();
    let crossing = bridge.enter_left().unwrap();

    let bridge2 = bridge.clone();
    let waiter = thread::spawn(move || bridge2.enter_right().map(|c| c.release()).unwrap_err());

    thread::sleep(Duration::from_millis(20));
    bridge.close();

    assert_eq!(waiter.join().unwrap(), EnterError::Closed);
    assert_eq!(bridge.enter_left().unwrap_err(), EnterError::Closed);

    // The vehicle already on the deck finishes normally.
    crossing.release();
    assert_eq!(bridge.occupancy(), 0);
}

#[test]
fn test_event_hooks_observe_a_crossing() {
    let bridge = BridgeController::with_defaults();

    let entered = Arc::new(AtomicUsize::new(0));
    let left = Arc::new(AtomicUsize::new(0));
    let entered2 = Arc::clone(&entered);
    let left2 = Arc::clone(&left);
    bridge.hooks().on_event(move |event| match event {
        BridgeEvent::Entered { .. } => {
            entered2.fetch_add(1, Ordering::SeqCst);
        }
        BridgeEvent::Left { .. } => {
            left2.fetch_add(1, Ordering::SeqCst);
        }
        _ => {}
    });
    bridge.hooks().enable();

    bridge.enter_left().unwrap().release();
    bridge.enter_right().unwrap().release();

    assert_eq!(entered.load(Ordering::SeqCst), 2);
    assert_eq!(left.load(Ordering::SeqCst), 2);
}

#[test]
fn test_journal_captures_waits_and_holds() {
    let bridge = BridgeController::new(BridgeConfig::default().with_recording(true));

    {
        let crossing = bridge.enter_left().unwrap();
        thread::sleep(Duration::from_millis(5));
        crossing.release();
    }

    let records = bridge.take_journal();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].direction, Direction::Left);
    assert!(records[0].held >= Duration::from_millis(5));
    assert!(bridge.take_journal().is_empty());
}

#[test]
fn test_every_mode_carries_concurrent_traffic() {
    for mode in [
        AdmissionMode::Shared,
        AdmissionMode::Split,
        AdmissionMode::Gated,
        AdmissionMode::Arbitrated,
    ] {
        let config = BridgeConfig::default()
            .with_admission(mode)
            .with_poll_interval(Duration::from_micros(20));
        let bridge = BridgeController::new(config);

        let mut vehicles = Vec::new();
        for i in 0..4 {
            let bridge = bridge.clone();
            let direction = if i % 2 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            vehicles.push(thread::spawn(move || {
                for _ in 0..10 {
                    bridge.enter(direction).unwrap().release();
                }
            }));
        }
        for vehicle in vehicles {
            vehicle.join().unwrap();
        }

        assert_eq!(bridge.occupancy(), 0, "mode {mode:?} left the deck dirty");
        assert_eq!(bridge.stats().total_crossings(), 40);
        bridge.close();
    }
}
