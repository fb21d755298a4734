//! Input directory discovery and validation.
//!
//! The first stage of a build. Reads the input directory and decides what
//! becomes a background and what becomes a collection:
//!
//! ```text
//! gallery/                 # Input root
//! ├── bg1.jpg              # Top-level JPEG → background
//! ├── bg2.JPEG             # Extensions are case-insensitive
//! ├── notes.txt            # Other top-level files → silently ignored
//! ├── trip/                # Directory → collection titled "trip"
//! │   ├── a.jpg            # Picture
//! │   ├── b.png            # Not a JPEG → ignored, reported
//! │   ├── c.jpeg           # Picture
//! │   └── raw/             # Subdirectories → silently ignored, not recursed
//! └── winter/
//!     └── 001.jpg
//! ```
//!
//! ## Ordering
//!
//! Entries are taken in lexicographic file-name order. This order fixes every
//! output name, so the same input always yields the same layout and manifest.
//!
//! ## Validation
//!
//! Scanning fails, before anything is written, when:
//! - the input path is missing, not a directory, or unreadable
//! - there are no background images
//! - there are no collection folders
//! - a collection folder has no recognized pictures

use crate::imaging::is_supported_image;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Error opening folder \"{}\": {source}", .path.display())]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error opening folder \"{}\": Not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("Error reading folder \"{}\": {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Picture folder does not contain pictures: \"{}\"", .0.display())]
    EmptyCollection(PathBuf),
    #[error("No background images found in directory \"{}\"", .0.display())]
    NoBackgrounds(PathBuf),
    #[error(
        "No collection folders found in directory \"{}\"; provide a directory containing images and image folders",
        .0.display()
    )]
    NoCollections(PathBuf),
}

impl ScanError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::Missing { .. } => 5,
            ScanError::NotADirectory(_) => 6,
            ScanError::Unreadable { .. } => 7,
            ScanError::EmptyCollection(_) => 8,
            ScanError::NoBackgrounds(_) | ScanError::NoCollections(_) => 9,
        }
    }
}

/// Validated input: what the asset pipeline will turn into files.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryInput {
    /// Background source images, in listing order.
    pub backgrounds: Vec<PathBuf>,
    /// Collections, in listing order.
    pub collections: Vec<CollectionSource>,
    /// Non-picture files found inside collection folders.
    pub ignored: Vec<PathBuf>,
}

impl GalleryInput {
    pub fn picture_count(&self) -> usize {
        self.collections.iter().map(|c| c.pictures.len()).sum()
    }
}

/// One collection folder before processing.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSource {
    /// Folder name, used verbatim as the collection title.
    pub title: String,
    pub dir: PathBuf,
    /// Source pictures, in listing order. Never empty.
    pub pictures: Vec<PathBuf>,
}

/// Scan and validate an input directory.
pub fn scan(root: &Path) -> Result<GalleryInput, ScanError> {
    let entries = read_dir_sorted(root)?;

    let mut backgrounds = Vec::new();
    let mut folders = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            folders.push(entry);
        } else if is_supported_image(&entry) {
            backgrounds.push(entry);
        }
    }

    if backgrounds.is_empty() {
        return Err(ScanError::NoBackgrounds(root.to_path_buf()));
    }
    if folders.is_empty() {
        return Err(ScanError::NoCollections(root.to_path_buf()));
    }

    let mut collections = Vec::with_capacity(folders.len());
    let mut ignored = Vec::new();
    for folder in folders {
        let (collection, mut skipped) = scan_collection(&folder)?;
        collections.push(collection);
        ignored.append(&mut skipped);
    }

    Ok(GalleryInput {
        backgrounds,
        collections,
        ignored,
    })
}

/// Collect the pictures of one collection folder.
///
/// Returns the collection and the non-picture files that were skipped.
fn scan_collection(dir: &Path) -> Result<(CollectionSource, Vec<PathBuf>), ScanError> {
    let mut pictures = Vec::new();
    let mut ignored = Vec::new();

    for entry in read_dir_sorted(dir)? {
        if entry.is_dir() {
            continue;
        }
        if is_supported_image(&entry) {
            pictures.push(entry);
        } else {
            ignored.push(entry);
        }
    }

    if pictures.is_empty() {
        return Err(ScanError::EmptyCollection(dir.to_path_buf()));
    }

    let title = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok((
        CollectionSource {
            title,
            dir: dir.to_path_buf(),
            pictures,
        },
        ignored,
    ))
}

/// List a directory's entries sorted by file name.
fn read_dir_sorted(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let meta = fs::metadata(path).map_err(|source| ScanError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }

    let unreadable = |source| ScanError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(path)
        .map_err(unreadable)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(unreadable)?;

    entries.sort();
    Ok(entries)
}
