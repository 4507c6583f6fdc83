//! Criterion benches comparing admission strategies.

use criterion::{criterion_group, criterion_main, Criterion};
use onelane::{
    Admission, ArbitratedLane, CancelToken, Direction, GatedLane, SharedLane, SplitLane,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn bench_uncontended_roundtrip(c: &mut Criterion) {
    let token = CancelToken::new();

    let shared = SharedLane::new();
    c.bench_function("roundtrip/shared", |b| {
        b.iter(|| {
            shared.enter(Direction::Left, &token).unwrap();
            shared.leave(Direction::Left);
        })
    });

    let gated = GatedLane::new();
    c.bench_function("roundtrip/gated", |b| {
        b.iter(|| {
            gated.enter(Direction::Left, &token).unwrap();
            gated.leave(Direction::Left);
        })
    });

    let split = SplitLane::new();
    c.bench_function("roundtrip/split", |b| {
        b.iter(|| {
            split.enter(Direction::Left, &token).unwrap();
            split.leave(Direction::Left);
        })
    });

    // Every crossing pays the arbiter handshake, so this one is dominated
    // by the polling interval rather than lock cost.
    let arbitrated = ArbitratedLane::with_poll(Duration::from_micros(1));
    c.bench_function("roundtrip/arbitrated", |b| {
        b.iter(|| {
            arbitrated.enter(Direction::Left, &token).unwrap();
            arbitrated.leave(Direction::Left);
        })
    });
    arbitrated.close();
}

fn contended_crossings<L>(lane: &Arc<L>, crossings_each: usize)
where
    L: Admission + 'static,
{
    let mut vehicles = Vec::new();
    for side in [Direction::Left, Direction::Right] {
        let lane = Arc::clone(lane);
        vehicles.push(thread::spawn(move || {
            let token = CancelToken::new();
            for _ in 0..crossings_each {
                lane.enter(side, &token).unwrap();
                lane.leave(side);
            }
        }));
    }
    for vehicle in vehicles {
        vehicle.join().unwrap();
    }
}

fn bench_opposing_traffic(c: &mut Criterion) {
    let shared = Arc::new(SharedLane::new());
    c.bench_function("opposing/shared", |b| {
        b.iter(|| contended_crossings(&shared, 100))
    });

    let gated = Arc::new(GatedLane::new());
    c.bench_function("opposing/gated", |b| {
        b.iter(|| contended_crossings(&gated, 100))
    });
}

criterion_group!(benches, bench_uncontended_roundtrip, bench_opposing_traffic);
criterion_main!(benches);
