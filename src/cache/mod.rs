//! Concurrent decode-and-cache engine.
//!
//! The cache hands decode work to a fixed pool of background threads and
//! materializes the finished pixels into renderable assets on the owner
//! thread. Three pieces cooperate: [`ConcurrentQueue`] carries tasks out and
//! results back, [`worker`] runs the decode protocol, and [`ImageDatabase`]
//! owns the per-index load state and the public request/drain API.

mod database;
mod queue;
mod worker;

use std::path::PathBuf;

use crate::decode::{Orientation, PixelBuffer};

pub use database::{indexed_paths, CacheStats, ImageDatabase};
pub use queue::ConcurrentQueue;
pub use worker::{default_worker_count, WorkerPool};

/// Which subset of {preview, full} a worker must decode for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    PreviewOnly,
    FullOnly,
    Both,
}

impl TaskKind {
    pub fn wants_preview(self) -> bool {
        matches!(self, TaskKind::PreviewOnly | TaskKind::Both)
    }

    pub fn wants_full(self) -> bool {
        matches!(self, TaskKind::FullOnly | TaskKind::Both)
    }
}

/// One unit of decode work, consumed exactly once by whichever worker pops it.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub index: usize,
    pub source_path: PathBuf,
    pub kind: TaskKind,
}

/// The two asset tiers a record tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Preview,
    Full,
}

/// A finished decode travelling from a worker back to the owner thread.
///
/// Orientation only rides along with the preview; the full decode is
/// unrotated by convention, so the render-time transform comes from the
/// preview's metadata.
#[derive(Debug)]
pub enum LoadOutcome {
    Preview {
        index: usize,
        pixels: PixelBuffer,
        orientation: Orientation,
    },
    Full {
        index: usize,
        pixels: PixelBuffer,
    },
}

impl LoadOutcome {
    pub fn index(&self) -> usize {
        match self {
            LoadOutcome::Preview { index, .. } | LoadOutcome::Full { index, .. } => *index,
        }
    }

    pub fn asset_kind(&self) -> AssetKind {
        match self {
            LoadOutcome::Preview { .. } => AssetKind::Preview,
            LoadOutcome::Full { .. } => AssetKind::Full,
        }
    }
}
