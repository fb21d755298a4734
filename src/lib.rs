//! # Static Gallery
//!
//! Builds a static picture gallery from a directory of JPEGs. Loose files in
//! the input root become backgrounds, each subdirectory becomes a collection,
//! and the result is a self-contained output directory: resized derivatives,
//! original copies, and a copy of an HTML template with a JSON manifest
//! spliced into its `index.html`.
//!
//! # Architecture: One Pass, Four Stages
//!
//! ```text
//! 1. Scan       gallery/          →  GalleryInput       (validate the directory contract)
//! 2. Process    GalleryInput      →  out/b, out/cN      (derivatives + manifest entries)
//! 3. Template   template/ + JSON  →  out/index.html     (copy, splice manifest)
//! 4. Optimize   out/index.html    →  out/index.html     (optional: inline, minify, strip comments)
//! ```
//!
//! Scanning validates everything before any file is written, so a bad input
//! directory never leaves a partial output. Every failure after that aborts the
//! run with a distinct exit status; see [`pipeline::GalleryError::exit_code`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: lists backgrounds and collections, enforces the input contract |
//! | [`process`] | Stage 2: writes backgrounds, original copies, display and thumbnail derivatives |
//! | [`manifest`] | JSON serialization of the collections spliced into the template |
//! | [`template`] | Stage 3: copies the template tree and splices the manifest into `index.html` |
//! | [`optimize`] | Stage 4: inlines stylesheets and scripts, strips comments |
//! | [`minify`] | Comment stripping and whitespace collapsing for CSS and JS |
//! | [`pipeline`] | Runs the stages in order; unified error type and exit codes |
//! | [`config`] | TOML config loading, merging, and CLI overrides |
//! | [`naming`] | Output path layout (`b/N.jpg`, `cN/M-p.jpg`, base-36 indices) |
//! | [`imaging`] | Pure-Rust resampling behind the [`imaging::ImageBackend`] trait |
//! | [`types`] | Shared types: `Size`, `Collection`, `PictureEntry` |
//! | [`output`] | CLI output formatting for every stage |
//!
//! # Design Decisions
//!
//! ## Deterministic Layout
//!
//! Output paths depend only on positions: the n-th background is `b/n.jpg`, the
//! m-th picture of the n-th collection lives in `cN/` with `N` and `M` written
//! in base 36. Directory listings are sorted by file name, so the same input
//! always produces the same tree and the same manifest.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and JPEG encoding all go through the `image`
//! crate. No system libraries, no external processes.
//!
//! ## Template Agnostic
//!
//! The gallery page itself is not generated. Any directory with an `index.html`
//! containing the two splice markers works as a template; the manifest lands
//! between them as a JSON literal the page's script can use directly.

pub mod config;
pub mod imaging;
pub mod manifest;
pub mod minify;
pub mod naming;
pub mod optimize;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod scan;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
