//! rawcache library
//!
//! A concurrent decode-and-cache engine for camera RAW photo browsers:
//! background workers decode previews and full-quality images off the owner
//! thread, and the cache materializes them into renderable assets on it.

pub mod cache;
pub mod cli;
pub mod config;
pub mod decode;
pub mod scan;
pub mod texture;

pub use cache::{CacheStats, ImageDatabase};
pub use config::Config;
pub use decode::{DecodeParams, Orientation, PixelBuffer, RawfileDecoder};
pub use scan::{scan_directory, SourceImage};
pub use texture::{software_uploader, ImageAsset};
