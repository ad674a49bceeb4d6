//! Decode collaborator: the trait seam the worker pool drives, plus the
//! pixel, parameter, and orientation types shared across the crate.
//!
//! All decode calls are synchronous and blocking; any error means "abort this
//! task, no result produced". The production implementation backed by
//! `rawloader` and `image` lives in [`rawfile`].

use std::fmt;
use std::path::{Path, PathBuf};

mod color;
pub mod rawfile;

pub use rawfile::RawfileDecoder;

/// Errors from opening or decoding a raw source file.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The source file could not be read from disk.
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The container did not parse as a supported raw format.
    #[error("Failed to unpack {path:?}: {message}")]
    Unpack { path: PathBuf, message: String },

    /// No embedded JPEG large enough to serve as a preview.
    #[error("No embedded preview found (smallest accepted is {min_bytes} bytes)")]
    MissingPreview { min_bytes: usize },

    /// An embedded JPEG was found but did not decode.
    #[error("Embedded preview failed to decode: {0}")]
    PreviewDecode(#[from] image::ImageError),

    /// The sensor data or its geometry is unusable.
    #[error("Unusable sensor data: {message}")]
    Sensor { message: String },
}

/// Rotation to apply at render time, tagged with the flip codes the rest of
/// the browser stack stores: 0 = as shot, 3 = 180°, 5 = 90° counter-clockwise,
/// 6 = 90° clockwise. Mirrored and transposed orientations outside this set
/// collapse to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    None,
    Rotate180,
    Rotate90Ccw,
    Rotate90Cw,
}

impl Orientation {
    /// Numeric flip code as carried in raw metadata.
    pub fn flip_code(self) -> u8 {
        match self {
            Orientation::None => 0,
            Orientation::Rotate180 => 3,
            Orientation::Rotate90Ccw => 5,
            Orientation::Rotate90Cw => 6,
        }
    }

    /// Parse a flip code; unknown codes collapse to `None`.
    pub fn from_flip_code(code: u8) -> Self {
        match code {
            3 => Orientation::Rotate180,
            5 => Orientation::Rotate90Ccw,
            6 => Orientation::Rotate90Cw,
            _ => Orientation::None,
        }
    }

    /// Whether the rotation swaps display width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Rotate90Ccw | Orientation::Rotate90Cw)
    }

    /// Clockwise rotation in degrees for the render call.
    pub fn rotation_degrees(self) -> f64 {
        match self {
            Orientation::None => 0.0,
            Orientation::Rotate180 => 180.0,
            Orientation::Rotate90Ccw => 270.0,
            Orientation::Rotate90Cw => 90.0,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Orientation::None => "as shot",
            Orientation::Rotate180 => "180°",
            Orientation::Rotate90Ccw => "90° ccw",
            Orientation::Rotate90Cw => "90° cw",
        };
        write!(f, "{}", label)
    }
}

/// Owned CPU-side pixels produced by the decode collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Tightly packed rows, `channels` bytes per pixel.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl PixelBuffer {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        Self {
            pixels,
            width,
            height,
            channels,
        }
    }

    /// Size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

/// Fixed parameters for the full-quality decode.
///
/// Defaults mirror the browser's standardized output: camera white balance,
/// sRGB primaries, the sRGB gamma pair (power 1/2.4, linear slope 12.92), and
/// auto-brightness with a 1% highlight clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeParams {
    /// Apply the as-shot white balance multipliers from the camera.
    pub camera_white_balance: bool,
    /// Scale brightness so the top percentile of samples saturates.
    pub auto_brighten: bool,
    /// Exponent of the gamma curve above the linear toe.
    pub gamma_power: f32,
    /// Slope of the linear toe near black.
    pub gamma_slope: f32,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            camera_white_balance: true,
            auto_brighten: true,
            gamma_power: 1.0 / 2.4,
            gamma_slope: 12.92,
        }
    }
}

/// Opens raw sources and hands out per-task decode sessions.
///
/// Implementations are shared across worker threads behind an `Arc`; the
/// sessions they produce belong to a single worker and never cross threads.
pub trait RawDecoder: Send + Sync {
    /// Open the source and unpack enough of it to serve preview and full
    /// decodes. Failure aborts the whole task, preview included.
    fn open_and_unpack(&self, path: &Path) -> Result<Box<dyn RawSession>, DecodeError>;
}

/// One opened source file. Sessions are not assumed safe for concurrent use;
/// every task gets a fresh one.
pub trait RawSession {
    /// Rotation stored in the source metadata, applied at render time.
    fn orientation(&self) -> Orientation;

    /// Decode the embedded low-resolution preview into an RGB pixel buffer.
    fn extract_preview(&mut self) -> Result<PixelBuffer, DecodeError>;

    /// Run the full-quality decode. The output is not pre-rotated.
    fn decode_full(&mut self, params: &DecodeParams) -> Result<PixelBuffer, DecodeError>;
}
