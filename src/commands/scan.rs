//! Scan command handler

use std::path::Path;

use anyhow::Result;

use rawcache::{scan_directory, Config};

use super::{age_human, size_human};

/// List the raw files under a path, as a table or as JSON.
#[cfg(not(tarpaulin_include))]
pub fn handle(path: &Path, json: bool) -> Result<()> {
    let config = Config::load()?;
    let images = scan_directory(path, &config.scan_options())?;

    if json {
        let entries: Vec<_> = images
            .iter()
            .map(|image| {
                serde_json::json!({
                    "path": image.path,
                    "size_bytes": image.size_bytes,
                    "modified": image.modified.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if images.is_empty() {
        println!("No raw files found under {}.", path.display());
        return Ok(());
    }

    let total_bytes: u64 = images.iter().map(|i| i.size_bytes).sum();
    println!(
        "Raw files: {} total ({})",
        images.len(),
        size_human(total_bytes)
    );
    println!();
    println!("  #  | Age  | Size       | Path");
    println!("-----+------+------------+---------------------------");
    for (i, image) in images.iter().enumerate() {
        println!(
            "{:>3}  | {:>4} | {:>10} | {}",
            i + 1,
            age_human(image.modified),
            size_human(image.size_bytes),
            image.path.display()
        );
    }

    Ok(())
}
