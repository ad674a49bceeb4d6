//! Shutdown and lifecycle edge cases.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::helpers::{stub_database, StubBehavior, StubDecoder, TEST_DEADLINE};

#[test]
fn results_pushed_before_stop_survive_it() {
    let decoder = StubDecoder::shared(StubBehavior::Instant);
    let mut db = stub_database(decoder, 2);
    db.start();

    db.request_full(0, Path::new("/img/one.nef"));
    db.request_preview(1, Path::new("/img/two.nef"));

    // Wait for the workers to finish without draining anything.
    let deadline = Instant::now() + TEST_DEADLINE;
    while db.pending_results() < 3 {
        assert!(Instant::now() < deadline, "workers never finished");
        std::thread::sleep(Duration::from_millis(5));
    }

    db.stop();
    assert!(!db.is_running());

    // One more drain after shutdown materializes everything that made it.
    assert_eq!(db.drain_completed(), 3);
    assert!(db.is_fully_loaded(0));
    assert!(db.preview(1).is_some());
}

#[test]
fn stop_joins_even_with_a_decode_in_flight() {
    let decoder = StubDecoder::shared(StubBehavior::Slow(Duration::from_millis(200)));
    let mut db = stub_database(decoder, 1);
    db.start();

    db.request_preview(0, Path::new("/img/slow.nef"));
    std::thread::sleep(Duration::from_millis(20)); // let the worker pick it up

    // Joining waits for the current task, not for the idle loop.
    let started = Instant::now();
    db.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn restart_after_stop_resumes_processing() {
    let decoder = StubDecoder::shared(StubBehavior::Instant);
    let mut db = stub_database(decoder, 1);

    db.start();
    db.stop();

    // Tasks enqueued while stopped sit in the queue until the next start.
    db.request_preview(0, Path::new("/img/one.nef"));
    assert_eq!(db.queued_tasks(), 1);

    db.start();
    let deadline = Instant::now() + TEST_DEADLINE;
    loop {
        db.drain_completed();
        if db.preview(0).is_some() {
            break;
        }
        assert!(Instant::now() < deadline, "restarted pool never delivered");
        std::thread::sleep(Duration::from_millis(5));
    }
    db.stop();
}

#[test]
fn dropping_a_running_database_does_not_hang() {
    let decoder = StubDecoder::shared(StubBehavior::Slow(Duration::from_millis(100)));
    let mut db = stub_database(decoder, 2);
    db.start();
    db.request_preview(0, Path::new("/img/slow.nef"));

    let started = Instant::now();
    drop(db);
    assert!(started.elapsed() < Duration::from_secs(2));
}
