//! Shared test utilities for the static-gallery test suite.
//!
//! Builds throwaway input trees and templates on disk so scan, process and
//! pipeline tests can run against real directories.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_gallery(tmp.path(), &["bg.jpg"], &[("trip", &["a.jpg", "b.jpg"])]);
//! let input = scan(tmp.path()).unwrap();
//! assert_eq!(file_names(&input.collections[0].pictures), vec!["a.jpg", "b.jpg"]);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use std::fs;
use std::path::{Path, PathBuf};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a real JPEG with a simple gradient so the decoder has something to chew on.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128u8])
    });
    let file = fs::File::create(path).unwrap();
    let mut writer = std::io::BufWriter::new(file);
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, 90))
        .unwrap();
}

/// Lay out an input directory.
///
/// `backgrounds` land at the top level; each `(folder, files)` pair becomes a
/// collection folder. Files with a JPEG extension are real JPEGs, anything
/// else gets placeholder text.
pub fn write_gallery(root: &Path, backgrounds: &[&str], collections: &[(&str, &[&str])]) {
    fs::create_dir_all(root).unwrap();
    for name in backgrounds {
        write_fixture_file(&root.join(name));
    }
    for (folder, files) in collections {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        for name in *files {
            write_fixture_file(&dir.join(name));
        }
    }
}

fn write_fixture_file(path: &Path) {
    if crate::imaging::is_supported_image(path) {
        create_test_jpeg(path, 64, 48);
    } else {
        fs::write(path, "not a picture").unwrap();
    }
}

/// Write a template directory whose `index.html` carries the manifest markers.
pub fn write_template(dir: &Path) {
    fs::create_dir_all(dir.join("css")).unwrap();
    fs::write(
        dir.join("index.html"),
        "<html><head><script>var c = /*{{BEGIN:collections*/[]/*END:collections}}*/;</script></head><body></body></html>",
    )
    .unwrap();
    fs::write(dir.join("css").join("site.css"), "body { margin: 0; }").unwrap();
}

// =========================================================================
// Extractors
// =========================================================================

/// File names of `paths`, in order.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect()
}

/// Every file under `root`, as sorted `/`-joined relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}
