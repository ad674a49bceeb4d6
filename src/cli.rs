//! CLI definitions for rawcache
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages, markdown).

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Version string shown by `--version`: the crate version plus the git commit
/// for dev builds ("0.2.0 (abc1234)"). Official builds set the `release`
/// feature, build.rs emits no git info, and the hash is dropped.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");
#[cfg(feature = "release")]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build clap styles using our theme colors.
///
/// - Green: headers, usage, command names (accent color)
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "rawcache")]
#[command(about = "[ rawcache ] - concurrent decode-and-cache engine for camera RAW files")]
#[command(
    long_about = "rawcache - Concurrent decode-and-cache engine for camera RAW photo browsers.

rawcache decodes camera raw files (NEF, CR2, ARW, DNG, ...) on a pool of
background workers: a fast embedded-JPEG preview first, then a full-quality
half-resolution develop with standardized color. A photo browser embeds the
library; this binary exercises the same engine from the command line.

QUICK START:
    rawcache scan ~/Pictures/shoot     List the raw files in a directory
    rawcache probe IMG_0001.CR2        Inspect one file through the decoder
    rawcache warm ~/Pictures/shoot     Decode every preview into the cache

For more information, see the library documentation."
)]
#[command(version = VERSION)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List raw files under a directory
    #[command(long_about = "Recursively list the camera raw files under a path.

Recognizes the usual raw extensions (NEF, CR2/CR3, ARW, ORF, RW2, DNG, RAF
and friends) case-insensitively; extra extensions can be added under [scan]
in the config file. Unreadable entries are skipped, and the result is sorted
by path for a stable order.

EXAMPLES:
    rawcache scan ~/Pictures/shoot          Human-readable table
    rawcache scan ~/Pictures/shoot --json   Machine-readable output
    rawcache scan IMG_0001.CR2              A single file lists itself")]
    Scan {
        /// Directory (or single file) to scan
        #[arg(help = "Directory or raw file to scan")]
        path: PathBuf,
        /// Output as JSON
        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },

    /// Inspect one raw file through the decoder
    #[command(long_about = "Open a single raw file and report what the decoder sees.

Shows how long the open took, the stored orientation, and whether a usable
embedded preview exists (with its dimensions and size). With --full the full-quality decode
also runs and its output dimensions and timing are reported.

EXAMPLES:
    rawcache probe IMG_0001.CR2             Quick metadata and preview check
    rawcache probe IMG_0001.CR2 --full      Also time the full decode
    rawcache probe IMG_0001.CR2 --json      Machine-readable output")]
    Probe {
        /// Raw file to open
        #[arg(help = "Path to the raw file")]
        file: PathBuf,
        /// Also run the full-quality decode
        #[arg(long, help = "Run and time the full decode")]
        full: bool,
        /// Output as JSON
        #[arg(long, help = "Emit JSON instead of text")]
        json: bool,
    },

    /// Decode a directory into the cache
    #[command(long_about = "Scan a directory and run the cache end to end.

Every discovered file gets a preview request (and a full request with
--full); the worker pool decodes in the background while the owner loop
drains completed results. The run ends when everything requested is loaded,
or when no new result has arrived for the idle timeout (files that fail to
decode never produce one). Ctrl-C stops the workers gracefully.

EXAMPLES:
    rawcache warm ~/Pictures/shoot              Previews only
    rawcache warm ~/Pictures/shoot --full       Previews and full decodes
    rawcache warm ~/Pictures/shoot --workers 2  Limit the pool size")]
    Warm {
        /// Directory (or single file) to decode
        #[arg(help = "Directory or raw file to decode")]
        path: PathBuf,
        /// Also decode full-quality images
        #[arg(long, help = "Request full decodes as well as previews")]
        full: bool,
        /// Override the configured worker count
        #[arg(long, help = "Number of decode workers (default: config)")]
        workers: Option<usize>,
        /// Give up after this many seconds without a completed decode
        #[arg(
            long,
            default_value_t = 10,
            help = "Seconds without progress before giving up"
        )]
        idle_timeout: u64,
        /// Output as JSON
        #[arg(long, help = "Emit JSON statistics instead of text")]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions (hidden)
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Edit configuration in $EDITOR
    Edit,
}
