//! Bridge simulation demo
//!
//! Spawns vehicle threads on both banks, lets them cross a shared one-lane
//! bridge, and prints the statistics and journal afterwards.

use onelane::{AdmissionMode, BridgeConfig, BridgeController, Direction};
use std::thread;
use std::time::Duration;

const VEHICLES_PER_SIDE: usize = 3;
const CROSSINGS_PER_VEHICLE: usize = 5;

fn vehicle_thread(bridge: BridgeController, direction: Direction, id: usize) {
    for trip in 0..CROSSINGS_PER_VEHICLE {
        let crossing = match bridge.enter(direction) {
            Ok(crossing) => crossing,
            Err(err) => {
                println!("vehicle {direction}-{id}: turned away ({err})");
                return;
            }
        };
        println!(
            "vehicle {direction}-{id}: crossing (trip {trip}, waited {:?})",
            crossing.waited()
        );

        // Time on the bridge varies a little per vehicle.
        thread::sleep(Duration::from_millis(1 + (id as u64 % 3)));
        crossing.release();
    }
}

fn main() {
    println!("=== One-Lane Bridge Demo ===\n");

    let config = BridgeConfig::default()
        .with_admission(AdmissionMode::Gated)
        .with_recording(true);
    let bridge = BridgeController::new(config);

    let mut vehicles = Vec::new();
    for id in 0..VEHICLES_PER_SIDE {
        for direction in [Direction::Left, Direction::Right] {
            let bridge = bridge.clone();
            vehicles.push(thread::spawn(move || vehicle_thread(bridge, direction, id)));
        }
    }

    for vehicle in vehicles {
        vehicle.join().unwrap();
    }

    println!("\n{}", bridge.stats());

    let records = bridge.take_journal();
    println!("Journal ({} crossings):", records.len());
    for record in records.iter().take(10) {
        println!(
            "  #{:<3} {:>5}  waited {:>8?}  held {:>8?}",
            record.sequence, record.direction, record.waited, record.held
        );
    }
    if records.len() > 10 {
        println!("  ... and {} more", records.len() - 10);
    }
}
