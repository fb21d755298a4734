//! Asset generation.
//!
//! Stage 2 of the build. Takes the validated [`GalleryInput`] from the scan
//! stage and writes every derivative under the output root, returning the
//! collection list that becomes the manifest.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── b/
//! │   ├── 0.jpg          # background 0, fit into the background size
//! │   └── 1.jpg
//! └── c0/                # first collection
//!     ├── 0.jpg          # first picture, byte-for-byte copy of the source
//!     ├── 0-p.jpg        # fit into the display size
//!     └── 0-t.jpg        # fit into the thumbnail size
//! ```
//!
//! ## Failure Model
//!
//! The first failure aborts the run. Files already written stay where they
//! are; nothing is rolled back.
//!
//! ## Progress
//!
//! Each unit of work is reported as a [`ProcessEvent`] through a synchronous
//! callback, so the caller decides how (and whether) to display it.

use crate::config::GalleryConfig;
use crate::imaging::{
    BackendError, Derivative, ImageBackend, ResampleConfig, RustBackend, create_derivative,
};
use crate::naming::{self, PictureRole};
use crate::scan::GalleryInput;
use crate::types::{Collection, PictureEntry, Size};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Could not create directory \"{}\": {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not copy \"{}\" to \"{}\": {source}", .from.display(), .to.display())]
    CopyOriginal {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Imaging(#[from] BackendError),
}

impl ProcessError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::CreateDir { .. } => 10,
            ProcessError::CopyOriginal { .. } => 18,
            ProcessError::Imaging(e) => e.exit_code(),
        }
    }
}

/// Configuration for asset generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    pub thumbnail: Size,
    pub display: Size,
    pub background: Size,
    pub resample: ResampleConfig,
    /// Fill each picture's title with its source file stem.
    pub titles_from_filenames: bool,
}

impl ProcessConfig {
    /// Build a ProcessConfig from GalleryConfig values.
    pub fn from_gallery_config(config: &GalleryConfig) -> Self {
        Self {
            thumbnail: config.sizes.thumbnail,
            display: config.sizes.display,
            background: config.sizes.background,
            resample: ResampleConfig {
                quality: crate::imaging::Quality::new(config.images.quality),
                filter: config.images.filter,
            },
            titles_from_filenames: config.images.titles_from_filenames,
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_gallery_config(&GalleryConfig::default())
    }
}

/// Progress of the asset generation stage, in the order work happens.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    BackgroundsStarted {
        count: usize,
    },
    BackgroundWritten {
        index: usize,
        source: PathBuf,
        derivative: Derivative,
    },
    CollectionStarted {
        index: usize,
        title: String,
        picture_count: usize,
    },
    PictureProcessed {
        index: usize,
        source: PathBuf,
        fullsize: String,
        display: Derivative,
        thumbnail: Derivative,
    },
}

/// Generate all assets with the pure Rust backend.
pub fn process(
    output_root: &Path,
    config: &ProcessConfig,
    input: &GalleryInput,
    on_event: &mut dyn FnMut(ProcessEvent),
) -> Result<Vec<Collection>, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, output_root, config, input, on_event)
}

/// Generate all assets using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    output_root: &Path,
    config: &ProcessConfig,
    input: &GalleryInput,
    on_event: &mut dyn FnMut(ProcessEvent),
) -> Result<Vec<Collection>, ProcessError> {
    let backgrounds =
        process_backgrounds(backend, output_root, config, &input.backgrounds, on_event)?;

    let mut collections = Vec::with_capacity(input.collections.len());
    for (col_index, source) in input.collections.iter().enumerate() {
        on_event(ProcessEvent::CollectionStarted {
            index: col_index,
            title: source.title.clone(),
            picture_count: source.pictures.len(),
        });
        create_dir(&naming::to_output_path(
            output_root,
            &naming::collection_dir(col_index),
        ))?;

        let mut pictures = Vec::with_capacity(source.pictures.len());
        for (pic_index, picture) in source.pictures.iter().enumerate() {
            pictures.push(process_picture(
                backend,
                output_root,
                config,
                (col_index, pic_index),
                picture,
                on_event,
            )?);
        }

        collections.push(Collection {
            title: source.title.clone(),
            pictures,
            backgrounds: Vec::new(),
        });
    }

    for collection in &mut collections {
        collection.backgrounds = backgrounds.clone();
    }

    Ok(collections)
}

/// Write the shared background derivatives, returning their relative paths.
fn process_backgrounds(
    backend: &impl ImageBackend,
    output_root: &Path,
    config: &ProcessConfig,
    sources: &[PathBuf],
    on_event: &mut dyn FnMut(ProcessEvent),
) -> Result<Vec<String>, ProcessError> {
    on_event(ProcessEvent::BackgroundsStarted {
        count: sources.len(),
    });
    create_dir(&output_root.join(naming::BACKGROUNDS_DIR))?;

    let mut paths = Vec::with_capacity(sources.len());
    for (index, source) in sources.iter().enumerate() {
        let derivative = create_derivative(
            backend,
            source,
            output_root,
            &naming::background_path(index),
            config.background,
            &config.resample,
        )?;
        paths.push(derivative.path.clone());
        on_event(ProcessEvent::BackgroundWritten {
            index,
            source: source.clone(),
            derivative,
        });
    }
    Ok(paths)
}

/// Copy the original and write both derivatives of one picture.
fn process_picture(
    backend: &impl ImageBackend,
    output_root: &Path,
    config: &ProcessConfig,
    (collection, index): (usize, usize),
    source: &Path,
    on_event: &mut dyn FnMut(ProcessEvent),
) -> Result<PictureEntry, ProcessError> {
    let fullsize = naming::picture_path(collection, index, PictureRole::Fullsize);
    let fullsize_target = naming::to_output_path(output_root, &fullsize);
    fs::copy(source, &fullsize_target).map_err(|e| ProcessError::CopyOriginal {
        from: source.to_path_buf(),
        to: fullsize_target.clone(),
        source: e,
    })?;

    let display = create_derivative(
        backend,
        source,
        output_root,
        &naming::picture_path(collection, index, PictureRole::Display),
        config.display,
        &config.resample,
    )?;
    let thumbnail = create_derivative(
        backend,
        source,
        output_root,
        &naming::picture_path(collection, index, PictureRole::Thumbnail),
        config.thumbnail,
        &config.resample,
    )?;

    let title = config
        .titles_from_filenames
        .then(|| source.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .flatten();

    let entry = PictureEntry {
        picture: display.path.clone(),
        fullsize: Some(fullsize.clone()),
        thumb: Some(thumbnail.path.clone()),
        title,
    };

    on_event(ProcessEvent::PictureProcessed {
        index,
        source: source.to_path_buf(),
        fullsize,
        display,
        thumbnail,
    });

    Ok(entry)
}

fn create_dir(path: &Path) -> Result<(), ProcessError> {
    fs::create_dir_all(path).map_err(|source| ProcessError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
