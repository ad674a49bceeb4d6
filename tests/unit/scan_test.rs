//! Source discovery tests.

use std::path::Path;

use rawcache::scan::{is_raw_file, scan_directory, ScanOptions, RAW_EXTENSIONS};

use crate::helpers::{dir_with_files, write_file};

#[test]
fn extension_table_covers_the_common_vendors() {
    for ext in ["nef", "cr2", "cr3", "arw", "dng", "raf", "orf", "rw2"] {
        assert!(RAW_EXTENSIONS.contains(&ext), "missing {}", ext);
    }
}

#[test]
fn extension_check_ignores_case_and_non_raw_files() {
    assert!(is_raw_file(Path::new("shot.NEF"), &[]));
    assert!(is_raw_file(Path::new("shot.cr3"), &[]));
    assert!(!is_raw_file(Path::new("shot.jpeg"), &[]));
    assert!(!is_raw_file(Path::new("Makefile"), &[]));
}

#[test]
fn configured_extra_extensions_are_accepted() {
    let extra = vec!["braw".to_string()];
    assert!(is_raw_file(Path::new("clip.braw"), &extra));
    assert!(!is_raw_file(Path::new("clip.braw"), &[]));
}

#[test]
fn scan_collects_only_raw_files_sorted_by_path() {
    let temp = dir_with_files(&["z.nef", "a.arw", "skip.txt", "sub/deep.cr2"]);

    let images = scan_directory(temp.path(), &ScanOptions::default()).unwrap();
    let names: Vec<_> = images
        .iter()
        .map(|i| i.path.strip_prefix(temp.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        [
            Path::new("a.arw"),
            Path::new("sub/deep.cr2"),
            Path::new("z.nef")
        ]
    );
}

#[test]
fn scan_records_file_sizes() {
    let temp = dir_with_files(&[]);
    write_file(temp.path(), "big.nef", &vec![0u8; 1024]);

    let images = scan_directory(temp.path(), &ScanOptions::default()).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].size_bytes, 1024);
}

#[test]
fn single_file_root_is_supported() {
    let temp = dir_with_files(&[]);
    let raw = write_file(temp.path(), "one.dng", b"x");
    let text = write_file(temp.path(), "one.txt", b"x");

    assert_eq!(
        scan_directory(&raw, &ScanOptions::default()).unwrap().len(),
        1
    );
    assert!(scan_directory(&text, &ScanOptions::default())
        .unwrap()
        .is_empty());
}
