//! ConcurrentQueue contract tests through the public API.

use std::sync::Arc;
use std::thread;

use rawcache::cache::ConcurrentQueue;

#[test]
fn fifo_order_is_preserved() {
    let queue = ConcurrentQueue::new();
    for i in 0..10 {
        queue.push(i);
    }
    for i in 0..10 {
        assert_eq!(queue.try_pop(), Some(i));
    }
    assert_eq!(queue.try_pop(), None);
}

#[test]
fn try_pop_never_blocks_on_empty() {
    let queue: ConcurrentQueue<u8> = ConcurrentQueue::new();
    // Repeated polling on an empty queue just keeps returning None.
    for _ in 0..1_000 {
        assert!(queue.try_pop().is_none());
    }
}

#[test]
fn len_and_is_empty_track_contents() {
    let queue = ConcurrentQueue::new();
    assert!(queue.is_empty());
    queue.push("a");
    queue.push("b");
    assert_eq!(queue.len(), 2);
    assert!(!queue.is_empty());
    queue.try_pop();
    queue.try_pop();
    assert!(queue.is_empty());
}

#[test]
fn producers_and_consumers_agree_on_item_set() {
    let queue = Arc::new(ConcurrentQueue::new());
    let producers = 3;
    let per_producer = 200;

    let producer_handles: Vec<_> = (0..producers)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..per_producer {
                    queue.push(p * per_producer + i);
                }
            })
        })
        .collect();
    for handle in producer_handles {
        handle.join().unwrap();
    }

    let consumer_handles: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(item) = queue.try_pop() {
                    seen.push(item);
                }
                seen
            })
        })
        .collect();

    let mut all: Vec<i32> = consumer_handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort_unstable();

    let expected: Vec<i32> = (0..producers * per_producer).collect();
    assert_eq!(all, expected);
}
