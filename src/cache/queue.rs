//! Thread-safe FIFO queue shared between the owner thread and decode workers.
//!
//! Two instances of the same container form the pipeline: one carries decode
//! tasks from the owner thread to the worker pool, the other carries finished
//! results back. A single mutex guards the deque; outstanding item counts are
//! small (dozens to low thousands) and decode latency dwarfs lock cost, so
//! simplicity wins over wait-free cleverness.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Mutex-guarded FIFO safe for concurrent producers and consumers.
pub struct ConcurrentQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> ConcurrentQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Append an item to the tail. Always succeeds and returns immediately.
    pub fn push(&self, item: T) {
        self.items.lock().unwrap().push_back(item);
    }

    /// Remove and return the head, or `None` if the queue is empty.
    ///
    /// Never blocks waiting for items to arrive, so it is safe in hot polling
    /// loops that must stay responsive to a shutdown flag.
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().unwrap().pop_front()
    }

    /// Whether the queue is currently empty.
    ///
    /// Advisory only: under concurrent modification the answer can be stale
    /// the instant this returns. Callers must not treat it as a
    /// synchronization point.
    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    /// Number of queued items. Advisory only, like `is_empty`.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
