//! Source discovery: find the camera raw files under a directory.
//!
//! The walk is recursive, skips unreadable entries with a log instead of
//! aborting, and returns a path-sorted list so the browsing order is stable
//! across runs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Raw file extensions recognized out of the box (lowercase, no dot).
pub const RAW_EXTENSIONS: &[&str] = &[
    "nef", // Nikon
    "cr2", "cr3", // Canon
    "arw", "srf", "sr2", // Sony
    "orf", // Olympus
    "rw2", // Panasonic
    "dng", // Adobe (universal raw)
    "raf", // Fujifilm
    "pef", // Pentax
    "3fr", // Hasselblad
    "dcr", "k25", "kdc", // Kodak
    "mrw", // Minolta
    "nrw", // Nikon (newer)
    "raw", // Generic
    "rwl", // Leica
    "srw", // Samsung
    "x3f", // Sigma
    "iiq", // Phase One
    "erf", // Epson
    "mef", // Mamiya
    "mos", // Leaf
    "r3d", // RED
];

/// How a scan walks the filesystem.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub follow_symlinks: bool,
    /// Additional extensions to accept (lowercase, no dot).
    pub extra_extensions: Vec<String>,
}

/// One discovered raw file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

/// Whether a path looks like a raw file, by extension (case-insensitive).
pub fn is_raw_file(path: &Path, extra_extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    RAW_EXTENSIONS.contains(&ext.as_str()) || extra_extensions.iter().any(|e| e == &ext)
}

/// Recursively collect the raw files under `root`, sorted by path.
///
/// A single-file root yields that file if it is a raw file. Entries that
/// cannot be read (permissions, dangling links) are skipped with a log.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<Vec<SourceImage>> {
    let started = Instant::now();

    let metadata = root
        .metadata()
        .with_context(|| format!("Cannot access {:?}", root))?;
    if metadata.is_file() {
        let mut images = Vec::new();
        if is_raw_file(root, &options.extra_extensions) {
            images.push(source_image(root.to_path_buf(), &metadata)?);
        }
        return Ok(images);
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(root).follow_links(options.follow_symlinks) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_raw_file(entry.path(), &options.extra_extensions) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %entry.path().display(), %err, "skipping file without metadata");
                continue;
            }
        };
        images.push(source_image(entry.into_path(), &metadata)?);
    }

    images.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(
        root = %root.display(),
        found = images.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan finished"
    );
    Ok(images)
}

fn source_image(path: PathBuf, metadata: &std::fs::Metadata) -> Result<SourceImage> {
    let modified = metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());
    Ok(SourceImage {
        path,
        size_bytes: metadata.len(),
        modified,
    })
}
