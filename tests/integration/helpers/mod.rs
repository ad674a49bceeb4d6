//! Test helper utilities: stub decoders and polling loops.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rawcache::decode::{
    DecodeError, DecodeParams, Orientation, PixelBuffer, RawDecoder, RawSession,
};
use rawcache::texture::software_uploader;
use rawcache::ImageDatabase;

/// How long polling helpers wait before declaring a test hung.
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

/// What a stub decoder should do per call.
#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// Every step succeeds immediately.
    Instant,
    /// Every step succeeds after sleeping this long in `open_and_unpack`.
    Slow(Duration),
    /// `open_and_unpack` always fails.
    FailOpen,
    /// Opens fine but has no embedded preview.
    NoPreview,
    /// Opens fine but the full decode fails.
    FailFull,
}

/// Shared stub decoder that counts session opens.
pub struct StubDecoder {
    behavior: StubBehavior,
    opens: AtomicUsize,
}

impl StubDecoder {
    pub fn shared(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            opens: AtomicUsize::new(0),
        })
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl RawDecoder for StubDecoder {
    fn open_and_unpack(&self, path: &Path) -> Result<Box<dyn RawSession>, DecodeError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            StubBehavior::FailOpen => {
                return Err(DecodeError::Unpack {
                    path: path.to_path_buf(),
                    message: "stub refuses to open".into(),
                })
            }
            StubBehavior::Slow(delay) => thread::sleep(delay),
            _ => {}
        }
        Ok(Box::new(StubSession {
            behavior: self.behavior,
        }))
    }
}

struct StubSession {
    behavior: StubBehavior,
}

impl RawSession for StubSession {
    fn orientation(&self) -> Orientation {
        Orientation::Rotate90Cw
    }

    fn extract_preview(&mut self) -> Result<PixelBuffer, DecodeError> {
        if matches!(self.behavior, StubBehavior::NoPreview) {
            return Err(DecodeError::MissingPreview { min_bytes: 10_000 });
        }
        Ok(PixelBuffer::new(vec![10; 2 * 2 * 3], 2, 2, 3))
    }

    fn decode_full(&mut self, _params: &DecodeParams) -> Result<PixelBuffer, DecodeError> {
        if matches!(self.behavior, StubBehavior::FailFull) {
            return Err(DecodeError::Sensor {
                message: "stub full decode failure".into(),
            });
        }
        Ok(PixelBuffer::new(vec![20; 8 * 8 * 3], 8, 8, 3))
    }
}

/// A database over a stub decoder with the software uploader and `workers`
/// threads (not yet started).
pub fn stub_database(decoder: Arc<StubDecoder>, workers: usize) -> ImageDatabase<PixelBuffer> {
    ImageDatabase::new(
        decoder,
        DecodeParams::default(),
        workers,
        software_uploader(),
    )
}

/// Drain repeatedly until `done` returns true or the deadline passes.
///
/// Panics on timeout so a hung pipeline fails the test instead of wedging it.
pub fn drain_until<T>(
    db: &mut ImageDatabase<T>,
    mut done: impl FnMut(&ImageDatabase<T>) -> bool,
    what: &str,
) {
    let deadline = Instant::now() + TEST_DEADLINE;
    loop {
        db.drain_completed();
        if done(db) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(5));
    }
}
