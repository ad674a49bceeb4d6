//! Owner-thread asset cache: the per-index load-state table and the public
//! request/drain API.
//!
//! The database is single-owner by construction: every operation except
//! worker lifetime management runs on the thread that owns it, so the record
//! table needs no locking. Workers only ever see the two queues. Once a slot
//! reports loaded it never reverts, and a slot is enqueued at most once for
//! the life of the cache. A failed decode leaves it requested forever, which
//! the owner observes as a result that never arrives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::queue::ConcurrentQueue;
use super::worker::WorkerPool;
use super::{AssetKind, LoadOutcome, LoadRequest, TaskKind};
use crate::decode::{DecodeParams, RawDecoder};
use crate::texture::{ImageAsset, Uploader};

/// Load state of one asset tier for one image.
///
/// Monotonic: `NotRequested -> Requested -> Loaded`, no path back. A decode
/// failure parks the slot at `Requested` permanently.
enum AssetSlot<T> {
    NotRequested,
    Requested,
    Loaded(ImageAsset<T>),
}

impl<T> AssetSlot<T> {
    fn asset(&self) -> Option<&ImageAsset<T>> {
        match self {
            AssetSlot::Loaded(asset) => Some(asset),
            _ => None,
        }
    }

    fn is_loaded(&self) -> bool {
        matches!(self, AssetSlot::Loaded(_))
    }

    fn is_requested(&self) -> bool {
        !matches!(self, AssetSlot::NotRequested)
    }
}

/// Per-index record, created lazily on first query and never removed.
struct ImageRecord<T> {
    preview: AssetSlot<T>,
    full: AssetSlot<T>,
}

impl<T> Default for ImageRecord<T> {
    fn default() -> Self {
        Self {
            preview: AssetSlot::NotRequested,
            full: AssetSlot::NotRequested,
        }
    }
}

/// Counts over the record table, computed on demand.
///
/// Requested counts include loaded slots, since a loaded slot was necessarily
/// requested first and the flag is never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub records: usize,
    pub previews_requested: usize,
    pub previews_loaded: usize,
    pub fulls_requested: usize,
    pub fulls_loaded: usize,
}

impl CacheStats {
    /// Format a summary for display.
    pub fn summary(&self) -> String {
        format!(
            "Images: {} tracked\n   Previews: {}/{} loaded\n   Fulls: {}/{} loaded",
            self.records,
            self.previews_loaded,
            self.previews_requested,
            self.fulls_loaded,
            self.fulls_requested
        )
    }
}

/// The image asset cache ("database"): request de-duplication, background
/// decode scheduling, and owner-thread materialization of renderable assets.
///
/// `T` is the renderable handle type produced by the upload collaborator:
/// a GPU texture id for a real renderer, or plain pixels for headless use
/// (see [`crate::texture::software_uploader`]).
///
/// All methods except `start`/`stop` must be called from the owning thread;
/// the type is deliberately not `Sync` to keep that discipline.
pub struct ImageDatabase<T> {
    decoder: Arc<dyn RawDecoder>,
    params: DecodeParams,
    worker_count: usize,
    uploader: Uploader<T>,
    tasks: Arc<ConcurrentQueue<LoadRequest>>,
    results: Arc<ConcurrentQueue<LoadOutcome>>,
    records: HashMap<usize, ImageRecord<T>>,
    pool: Option<WorkerPool>,
}

impl<T> ImageDatabase<T> {
    /// Build a cache around a decoder and an upload collaborator.
    ///
    /// `worker_count` of zero means detected hardware parallelism. Workers do
    /// not run until [`start`](Self::start) is called.
    pub fn new(
        decoder: Arc<dyn RawDecoder>,
        params: DecodeParams,
        worker_count: usize,
        uploader: Uploader<T>,
    ) -> Self {
        let worker_count = if worker_count == 0 {
            super::worker::default_worker_count()
        } else {
            worker_count
        };

        Self {
            decoder,
            params,
            worker_count,
            uploader,
            tasks: Arc::new(ConcurrentQueue::new()),
            results: Arc::new(ConcurrentQueue::new()),
            records: HashMap::new(),
            pool: None,
        }
    }

    /// Spawn the worker pool. A second call while running is a no-op.
    pub fn start(&mut self) {
        if self.pool.is_some() {
            return;
        }
        self.pool = Some(WorkerPool::spawn(
            self.worker_count,
            Arc::clone(&self.tasks),
            Arc::clone(&self.results),
            Arc::clone(&self.decoder),
            self.params,
        ));
    }

    /// Signal workers to exit and join them.
    ///
    /// Idempotent and safe from the drop path. Results already pushed before
    /// shutdown stay in the result queue and remain retrievable by one more
    /// [`drain_completed`](Self::drain_completed).
    pub fn stop(&mut self) {
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
        }
    }

    /// Whether the worker pool is currently running.
    pub fn is_running(&self) -> bool {
        self.pool.is_some()
    }

    /// Number of workers the pool runs (or will run) with.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Return the preview asset if loaded, otherwise ensure a decode is
    /// underway and return `None`.
    ///
    /// Idempotent: repeated calls for the same index never enqueue a second
    /// task.
    pub fn request_preview(&mut self, index: usize, source_path: &Path) -> Option<&ImageAsset<T>> {
        let record = self.records.entry(index).or_default();
        if !record.preview.is_requested() {
            record.preview = AssetSlot::Requested;
            self.tasks.push(LoadRequest {
                index,
                source_path: source_path.to_path_buf(),
                kind: TaskKind::PreviewOnly,
            });
        }
        record.preview.asset()
    }

    /// Return the full asset if loaded, otherwise ensure a decode is underway
    /// and return `None`.
    ///
    /// If the preview has not been requested yet, a single `Both` task is
    /// enqueued and the preview is marked requested as a side effect, so one
    /// session open serves both tiers when they are wanted close together.
    pub fn request_full(&mut self, index: usize, source_path: &Path) -> Option<&ImageAsset<T>> {
        let record = self.records.entry(index).or_default();
        if !record.full.is_requested() {
            record.full = AssetSlot::Requested;
            let kind = if record.preview.is_requested() {
                TaskKind::FullOnly
            } else {
                record.preview = AssetSlot::Requested;
                TaskKind::Both
            };
            self.tasks.push(LoadRequest {
                index,
                source_path: source_path.to_path_buf(),
                kind,
            });
        }
        record.full.asset()
    }

    /// Pre-warm previews for every entry not already loaded or requested.
    pub fn request_all_previews<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (usize, &'a Path)>,
    {
        for (index, path) in items {
            self.request_preview(index, path);
        }
    }

    /// True iff both the preview and the full asset are loaded.
    pub fn is_fully_loaded(&self, index: usize) -> bool {
        self.records
            .get(&index)
            .map(|record| record.preview.is_loaded() && record.full.is_loaded())
            .unwrap_or(false)
    }

    /// The loaded preview asset, if any. Never enqueues work.
    pub fn preview(&self, index: usize) -> Option<&ImageAsset<T>> {
        self.records.get(&index).and_then(|r| r.preview.asset())
    }

    /// The loaded full asset, if any. Never enqueues work.
    pub fn full(&self, index: usize) -> Option<&ImageAsset<T>> {
        self.records.get(&index).and_then(|r| r.full.asset())
    }

    /// Pop every currently available result and materialize it into a
    /// renderable asset. Returns how many assets were stored.
    ///
    /// Non-blocking and bounded by the queue depth at entry; never waits for
    /// more results to arrive. Must run on the owner thread once per tick;
    /// this is the only place asset availability becomes visible. An upload
    /// failure is logged and the slot stays requested, same as a decode
    /// failure.
    pub fn drain_completed(&mut self) -> usize {
        let mut materialized = 0;

        while let Some(outcome) = self.results.try_pop() {
            let (index, kind, pixels, orientation) = match outcome {
                LoadOutcome::Preview {
                    index,
                    pixels,
                    orientation,
                } => (index, AssetKind::Preview, pixels, orientation),
                LoadOutcome::Full { index, pixels } => {
                    (index, AssetKind::Full, pixels, Default::default())
                }
            };

            let record = self.records.entry(index).or_default();
            let slot = match kind {
                AssetKind::Preview => &mut record.preview,
                AssetKind::Full => &mut record.full,
            };
            if slot.is_loaded() {
                // Loaded state is monotonic; a duplicate result is dropped
                // before it costs an upload.
                debug!(index, ?kind, "duplicate result ignored");
                continue;
            }

            let handle = match (self.uploader)(&pixels) {
                Ok(handle) => handle,
                Err(err) => {
                    warn!(index, ?kind, %err, "upload failed, asset discarded");
                    continue;
                }
            };
            *slot = AssetSlot::Loaded(ImageAsset::new(
                handle,
                pixels.width,
                pixels.height,
                orientation,
            ));
            materialized += 1;
        }

        materialized
    }

    /// Tasks waiting in the work queue. Advisory only.
    pub fn queued_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Results waiting to be drained. Advisory only.
    pub fn pending_results(&self) -> usize {
        self.results.len()
    }

    /// Counts over the record table.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            records: self.records.len(),
            ..CacheStats::default()
        };
        for record in self.records.values() {
            if record.preview.is_requested() {
                stats.previews_requested += 1;
            }
            if record.preview.is_loaded() {
                stats.previews_loaded += 1;
            }
            if record.full.is_requested() {
                stats.fulls_requested += 1;
            }
            if record.full.is_loaded() {
                stats.fulls_loaded += 1;
            }
        }
        stats
    }
}

impl<T> Drop for ImageDatabase<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pair an index with its source path, the shape `request_all_previews`
/// consumes.
pub fn indexed_paths(paths: &[PathBuf]) -> impl Iterator<Item = (usize, &Path)> {
    paths.iter().enumerate().map(|(i, p)| (i, p.as_path()))
}
