//! Test helper utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temp directory pre-populated with the given file names.
pub fn dir_with_files(names: &[&str]) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    for name in names {
        write_file(temp.path(), name, b"not a real raw file");
    }
    temp
}

/// Write a small file and return its path.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(&path, contents).expect("Failed to write file");
    path
}
