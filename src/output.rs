//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and title. Filesystem paths
//! are secondary context on indented `Source:` lines, so the output reads as
//! an inventory of the gallery while still pointing back at the files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Backgrounds
//! 001 bg1.jpg
//!     Source: gallery/bg1.jpg
//!
//! Collections
//! 001 trip (2 pictures)
//!     Source: gallery/trip
//! ```
//!
//! ## Process
//!
//! ```text
//! Backgrounds (2)
//!     001 bg1.jpg → b/0.jpg (2560x1440)
//! 001 trip (2 pictures)
//!     001 a.jpg
//!         Source: gallery/trip/a.jpg
//!         original: c0/0.jpg
//!         display: c0/0-p.jpg (2560x1440)
//!         thumbnail: c0/0-t.jpg (960x540)
//! ```
//!
//! ## Template / Optimize
//!
//! ```text
//! Template: 4 files copied, manifest 312 bytes → out/index.html
//! Inlined style css/site.css (1024 bytes)
//! Minified inline script (312 bytes)
//! Removed 3 comments (5120 → 2048 bytes)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::imaging::Derivative;
use crate::optimize::{OptimizeReport, ReferenceAction};
use crate::pipeline::Reporter;
use crate::process::ProcessEvent;
use crate::scan::GalleryInput;
use crate::template::TemplateReport;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn pictures(count: usize) -> String {
    if count == 1 {
        "1 picture".to_string()
    } else {
        format!("{} pictures", count)
    }
}

fn derivative_line(label: &str, derivative: &Derivative) -> String {
    format!(
        "{}{}: {} ({}x{})",
        indent(2),
        label,
        derivative.path,
        derivative.dimensions.width,
        derivative.dimensions.height
    )
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the scanned inventory: backgrounds first, then collections.
pub fn format_scan_output(input: &GalleryInput) -> Vec<String> {
    let mut lines = vec!["Backgrounds".to_string()];
    for (i, background) in input.backgrounds.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file_name(background)));
        lines.push(format!("{}Source: {}", indent(1), background.display()));
    }

    lines.push(String::new());
    lines.push("Collections".to_string());
    for (i, collection) in input.collections.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            collection.title,
            pictures(collection.pictures.len())
        ));
        lines.push(format!("{}Source: {}", indent(1), collection.dir.display()));
    }
    lines
}

/// Warnings for files skipped because their extension is not recognized.
pub fn format_ignored(input: &GalleryInput) -> Vec<String> {
    input
        .ignored
        .iter()
        .map(|path| format!("Ignored unknown image file: {}", file_name(path)))
        .collect()
}

/// Print the inventory to stdout and ignored-file warnings to stderr.
pub fn print_scan_output(input: &GalleryInput) {
    for line in format_ignored(input) {
        eprintln!("{}", line);
    }
    for line in format_scan_output(input) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Process output
// ============================================================================

/// Format a single process progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BackgroundsStarted { count } => vec![format!("Backgrounds ({})", count)],
        ProcessEvent::BackgroundWritten {
            index,
            source,
            derivative,
        } => vec![format!(
            "{}{} {} \u{2192} {} ({}x{})",
            indent(1),
            format_index(index + 1),
            file_name(source),
            derivative.path,
            derivative.dimensions.width,
            derivative.dimensions.height
        )],
        ProcessEvent::CollectionStarted {
            index,
            title,
            picture_count,
        } => vec![format!(
            "{} {} ({})",
            format_index(index + 1),
            title,
            pictures(*picture_count)
        )],
        ProcessEvent::PictureProcessed {
            index,
            source,
            fullsize,
            display,
            thumbnail,
        } => vec![
            format!("{}{} {}", indent(1), format_index(index + 1), file_name(source)),
            format!("{}Source: {}", indent(2), source.display()),
            format!("{}original: {}", indent(2), fullsize),
            derivative_line("display", display),
            derivative_line("thumbnail", thumbnail),
        ],
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Template output
// ============================================================================

pub fn format_template_output(report: &TemplateReport) -> Vec<String> {
    vec![format!(
        "Template: {} files copied, manifest {} bytes \u{2192} {}",
        report.files_copied,
        report.manifest_bytes,
        report.index_path.display()
    )]
}

pub fn print_template_output(report: &TemplateReport) {
    for line in format_template_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 4: Optimize output
// ============================================================================

pub fn format_optimize_output(report: &OptimizeReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .actions
        .iter()
        .map(|action| match action {
            ReferenceAction::Inlined { kind, path, bytes } => {
                format!("Inlined {} {} ({} bytes)", kind, path, bytes)
            }
            ReferenceAction::Minified { kind, bytes } => {
                format!("Minified inline {} ({} bytes)", kind, bytes)
            }
        })
        .collect();
    lines.push(format!(
        "Removed {} comments ({} \u{2192} {} bytes)",
        report.comments_removed, report.bytes_before, report.bytes_after
    ));
    lines
}

pub fn print_optimize_output(report: &OptimizeReport) {
    for line in format_optimize_output(report) {
        println!("{}", line);
    }
}

/// Reporter that prints every stage to the console.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn scanned(&mut self, input: &GalleryInput) {
        print_scan_output(input);
        println!();
    }

    fn process_event(&mut self, event: &ProcessEvent) {
        print_process_event(event);
    }

    fn template_written(&mut self, report: &TemplateReport) {
        print_template_output(report);
    }

    fn optimized(&mut self, report: &OptimizeReport) {
        print_optimize_output(report);
    }
}

// ============================================================================
// Tests
// ============================================================================
