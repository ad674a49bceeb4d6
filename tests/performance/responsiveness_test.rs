//! Owner-thread latency under slow decodes.
//!
//! The bound asserted here is deliberately loose (an owner-thread call that
//! takes 200ms against a 2s decode is already broken) so the tests stay
//! stable on loaded CI machines.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::helpers::{drain_until, stub_database, StubBehavior, StubDecoder};

const SLOW_DECODE: Duration = Duration::from_secs(2);
const OWNER_BUDGET: Duration = Duration::from_millis(200);

#[test]
fn requests_return_immediately_while_decodes_run() {
    let decoder = StubDecoder::shared(StubBehavior::Slow(SLOW_DECODE));
    let mut db = stub_database(decoder, 2);
    db.start();

    let started = Instant::now();
    for index in 0..50 {
        db.request_preview(index, Path::new("/img/slow.nef"));
        db.request_full(index, Path::new("/img/slow.nef"));
    }
    assert!(
        started.elapsed() < OWNER_BUDGET,
        "requests blocked on decode: {:?}",
        started.elapsed()
    );
    db.stop();
}

#[test]
fn drain_never_waits_for_in_flight_work() {
    let decoder = StubDecoder::shared(StubBehavior::Slow(SLOW_DECODE));
    let mut db = stub_database(decoder, 2);
    db.start();

    db.request_preview(0, Path::new("/img/slow.nef"));
    std::thread::sleep(Duration::from_millis(50)); // decode now in flight

    let started = Instant::now();
    for _ in 0..100 {
        db.drain_completed();
        db.stats();
    }
    assert!(
        started.elapsed() < OWNER_BUDGET,
        "drain blocked on decode: {:?}",
        started.elapsed()
    );
    db.stop();
}

#[test]
fn drain_cost_is_bounded_by_the_results_present_at_entry() {
    let decoder = StubDecoder::shared(StubBehavior::Instant);
    let mut db = stub_database(decoder, 4);
    db.start();

    let count = 200;
    for index in 0..count {
        db.request_preview(index, Path::new("/img/burst.nef"));
    }
    drain_until(
        &mut db,
        |db| db.stats().previews_loaded == count,
        "burst to finish",
    );
    db.stop();

    // With everything already materialized, further drains are trivial.
    let started = Instant::now();
    for _ in 0..1000 {
        assert_eq!(db.drain_completed(), 0);
    }
    assert!(
        started.elapsed() < OWNER_BUDGET,
        "empty drain too expensive: {:?}",
        started.elapsed()
    );
}
