//! Background worker pool for raw decoding.
//!
//! Each worker loops on the task queue: pop a task, run the decode protocol
//! synchronously, push one or two results, repeat. An empty queue means a
//! short bounded sleep rather than a blocking wait, so the shutdown flag is
//! observed every iteration. All decode errors are handled here, logged and
//! dropped, never surfaced to the owner thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use super::queue::ConcurrentQueue;
use super::{LoadOutcome, LoadRequest};
use crate::decode::{DecodeParams, RawDecoder};

/// Idle backoff between polls of an empty task queue.
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// Detected hardware parallelism, floored at one worker.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A fixed set of decode threads draining a shared task queue.
///
/// Created by [`WorkerPool::spawn`]; torn down by [`WorkerPool::shutdown`] or
/// drop, which signals the loop flag and joins every thread. Joining is
/// bounded by the current task since tasks are not preemptible.
pub struct WorkerPool {
    running: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers pulling from `tasks` and publishing to `results`.
    ///
    /// The decoder is shared across workers, but every task opens its own
    /// session; sessions never cross threads.
    pub fn spawn(
        count: usize,
        tasks: Arc<ConcurrentQueue<LoadRequest>>,
        results: Arc<ConcurrentQueue<LoadOutcome>>,
        decoder: Arc<dyn RawDecoder>,
        params: DecodeParams,
    ) -> Self {
        let count = count.max(1);
        let running = Arc::new(AtomicBool::new(true));

        let handles = (0..count)
            .map(|i| {
                let running = Arc::clone(&running);
                let tasks = Arc::clone(&tasks);
                let results = Arc::clone(&results);
                let decoder = Arc::clone(&decoder);

                thread::Builder::new()
                    .name(format!("decode-worker-{}", i))
                    .spawn(move || {
                        while running.load(Ordering::Relaxed) {
                            match tasks.try_pop() {
                                Some(task) => run_task(&task, &results, decoder.as_ref(), &params),
                                None => thread::sleep(IDLE_SLEEP),
                            }
                        }
                    })
                    .expect("failed to spawn decode worker")
            })
            .collect();

        Self { running, handles }
    }

    /// Number of threads in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Signal the worker loops to exit and join every thread.
    ///
    /// Safe to call more than once; after the first call the pool is empty.
    /// No worker touches the queues after this returns.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Execute one task end to end, pushing at most one result per wanted tier.
///
/// Open/unpack failure aborts the whole task; a failed preview is non-fatal
/// when the task also wants the full decode. For a `Both` task the preview
/// result is always pushed before the full one.
pub(crate) fn run_task(
    task: &LoadRequest,
    results: &ConcurrentQueue<LoadOutcome>,
    decoder: &dyn RawDecoder,
    params: &DecodeParams,
) {
    let mut session = match decoder.open_and_unpack(&task.source_path) {
        Ok(session) => session,
        Err(err) => {
            warn!(
                index = task.index,
                path = %task.source_path.display(),
                %err,
                "failed to open raw source, dropping task"
            );
            return;
        }
    };

    let orientation = session.orientation();

    if task.kind.wants_preview() {
        match session.extract_preview() {
            Ok(pixels) => results.push(LoadOutcome::Preview {
                index: task.index,
                pixels,
                orientation,
            }),
            Err(err) => {
                // Non-fatal: the full decode below can still succeed.
                warn!(
                    index = task.index,
                    path = %task.source_path.display(),
                    %err,
                    "preview extraction failed"
                );
            }
        }
    }

    if task.kind.wants_full() {
        match session.decode_full(params) {
            Ok(pixels) => {
                debug!(
                    index = task.index,
                    width = pixels.width,
                    height = pixels.height,
                    "full decode finished"
                );
                results.push(LoadOutcome::Full {
                    index: task.index,
                    pixels,
                });
            }
            Err(err) => {
                warn!(
                    index = task.index,
                    path = %task.source_path.display(),
                    %err,
                    "full decode failed"
                );
            }
        }
    }
}
