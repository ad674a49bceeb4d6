//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Decode and worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Number of decode workers; 0 means detected hardware parallelism
    #[serde(default)]
    pub workers: usize,
    /// Apply the camera's as-shot white balance
    #[serde(default = "default_camera_white_balance")]
    pub camera_white_balance: bool,
    /// Scale brightness so the top percentile of samples saturates
    #[serde(default = "default_auto_brighten")]
    pub auto_brighten: bool,
}

pub fn default_camera_white_balance() -> bool {
    true
}

pub fn default_auto_brighten() -> bool {
    true
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            camera_white_balance: default_camera_white_balance(),
            auto_brighten: default_auto_brighten(),
        }
    }
}

/// Directory scan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Follow symlinks while walking directories
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Extra raw file extensions to accept (lowercase, no dot)
    #[serde(default)]
    pub extra_extensions: Vec<String>,
}
