//! Configuration management for rawcache

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::PathBuf;

use crate::cache::default_worker_count;
use crate::decode::DecodeParams;
use crate::scan::ScanOptions;

impl Config {
    /// Get the config file path (~/.config/rawcache/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/rawcache)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        io::save(self)
    }

    /// Resolve the configured worker count, mapping 0 to detected hardware
    /// parallelism with a floor of one.
    pub fn effective_workers(&self) -> usize {
        if self.decode.workers == 0 {
            default_worker_count()
        } else {
            self.decode.workers
        }
    }

    /// Decode parameters derived from the `[decode]` section.
    pub fn decode_params(&self) -> DecodeParams {
        DecodeParams {
            camera_white_balance: self.decode.camera_white_balance,
            auto_brighten: self.decode.auto_brighten,
            ..DecodeParams::default()
        }
    }

    /// Scan options derived from the `[scan]` section.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            follow_symlinks: self.scan.follow_symlinks,
            extra_extensions: self.scan.extra_extensions.clone(),
        }
    }
}
