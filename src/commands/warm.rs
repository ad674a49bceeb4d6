//! Warm command handler: run the cache end to end over a directory.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use rawcache::decode::RawDecoder;
use rawcache::{scan_directory, software_uploader, Config, ImageDatabase, RawfileDecoder};

/// Tick interval of the owner loop between drains.
const TICK: Duration = Duration::from_millis(25);

/// Scan a path, request every asset, and drain until done or stalled.
///
/// Files that fail to decode never complete (the cache reports nothing for
/// them), so the loop also ends when no result has arrived for `idle_timeout`
/// seconds and reports the leftovers as unfinished.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    path: &Path,
    full: bool,
    workers: Option<usize>,
    idle_timeout: u64,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let images = scan_directory(path, &config.scan_options())?;

    if images.is_empty() {
        if json {
            println!("{}", serde_json::json!({ "files": 0 }));
        } else {
            println!("No raw files found under {}.", path.display());
        }
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    let worker_count = workers.unwrap_or_else(|| config.effective_workers());
    let decoder: Arc<dyn RawDecoder> = Arc::new(RawfileDecoder::new());
    let mut db = ImageDatabase::new(
        decoder,
        config.decode_params(),
        worker_count,
        software_uploader(),
    );

    db.start();
    let started = Instant::now();

    // Requesting the full first couples both tiers into one task, so each
    // file is opened once even when both assets are wanted.
    for (index, image) in images.iter().enumerate() {
        if full {
            db.request_full(index, &image.path);
        } else {
            db.request_preview(index, &image.path);
        }
    }

    let wanted_previews = images.len();
    let wanted_fulls = if full { images.len() } else { 0 };
    let show_progress = !json && atty::is(atty::Stream::Stdout);
    let idle_limit = Duration::from_secs(idle_timeout.max(1));
    let mut last_result = Instant::now();
    let mut stalled = false;

    loop {
        if db.drain_completed() > 0 {
            last_result = Instant::now();
        }
        let stats = db.stats();

        if show_progress {
            print!(
                "\rPreviews {}/{}  Fulls {}/{}   ",
                stats.previews_loaded, wanted_previews, stats.fulls_loaded, wanted_fulls
            );
            io::stdout().flush()?;
        }

        if stats.previews_loaded >= wanted_previews && stats.fulls_loaded >= wanted_fulls {
            break;
        }
        if interrupted.load(Ordering::SeqCst) {
            break;
        }
        if last_result.elapsed() >= idle_limit {
            stalled = true;
            break;
        }
        thread::sleep(TICK);
    }

    db.stop();
    // Results pushed before shutdown are still retrievable.
    db.drain_completed();
    if show_progress {
        println!();
    }

    let stats = db.stats();
    let elapsed = started.elapsed();
    let unfinished = (wanted_previews - stats.previews_loaded.min(wanted_previews))
        + (wanted_fulls - stats.fulls_loaded.min(wanted_fulls));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "files": images.len(),
                "workers": db.worker_count(),
                "previews_loaded": stats.previews_loaded,
                "fulls_loaded": stats.fulls_loaded,
                "unfinished": unfinished,
                "interrupted": interrupted.load(Ordering::SeqCst),
                "stalled": stalled,
                "elapsed_ms": elapsed.as_millis() as u64,
            }))?
        );
        return Ok(());
    }

    println!("{}", stats.summary());
    println!(
        "   Workers: {}, elapsed: {:.1}s",
        db.worker_count(),
        elapsed.as_secs_f64()
    );
    if interrupted.load(Ordering::SeqCst) {
        println!("   Interrupted; workers stopped cleanly.");
    } else if stalled {
        println!(
            "   Gave up after {}s without progress; {} asset(s) never finished.",
            idle_timeout, unfinished
        );
    }

    Ok(())
}
