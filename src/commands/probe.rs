//! Probe command handler

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use rawcache::decode::{RawDecoder, RawfileDecoder};
use rawcache::Config;

use super::size_human;

/// Open one raw file through the production decoder and report what it sees.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, full: bool, json: bool) -> Result<()> {
    let config = Config::load()?;
    let decoder = RawfileDecoder::new();

    let opened = Instant::now();
    let mut session = decoder
        .open_and_unpack(file)
        .with_context(|| format!("Failed to open {:?}", file))?;
    let open_ms = opened.elapsed().as_millis() as u64;

    let orientation = session.orientation();
    let preview = session.extract_preview().ok();

    let full_result = if full {
        let started = Instant::now();
        let pixels = session
            .decode_full(&config.decode_params())
            .with_context(|| format!("Full decode of {:?} failed", file))?;
        Some((pixels, started.elapsed().as_millis() as u64))
    } else {
        None
    };

    if json {
        let mut report = serde_json::json!({
            "path": file,
            "orientation": orientation.flip_code(),
            "open_ms": open_ms,
            "preview": preview.as_ref().map(|p| serde_json::json!({
                "width": p.width,
                "height": p.height,
                "bytes": p.byte_len(),
            })),
        });
        if let Some((pixels, decode_ms)) = &full_result {
            report["full"] = serde_json::json!({
                "width": pixels.width,
                "height": pixels.height,
                "bytes": pixels.byte_len(),
                "decode_ms": decode_ms,
            });
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("   Opened in {}ms", open_ms);
    println!("   Orientation: {}", orientation);
    match &preview {
        Some(p) => println!(
            "   Preview: {}x{} ({})",
            p.width,
            p.height,
            size_human(p.byte_len() as u64)
        ),
        None => println!("   Preview: none embedded"),
    }
    if let Some((pixels, decode_ms)) = &full_result {
        println!(
            "   Full: {}x{} ({}) in {}ms",
            pixels.width,
            pixels.height,
            size_human(pixels.byte_len() as u64),
            decode_ms
        );
    }

    Ok(())
}
