//! Command handlers for the rawcache CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod completions;
pub mod config;
pub mod probe;
pub mod scan;
pub mod warm;

use chrono::{DateTime, Local};
use humansize::{format_size, DECIMAL};

/// Human-readable file size (e.g. "24.3 MB").
pub fn size_human(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Compact age of a timestamp relative to now (e.g. "3d", "5h", "12m").
pub fn age_human(modified: DateTime<Local>) -> String {
    let elapsed = Local::now().signed_duration_since(modified);
    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        "now".to_string()
    }
}
