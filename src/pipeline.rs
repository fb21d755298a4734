//! Build orchestration.
//!
//! Runs the stages in order and stops at the first failure:
//!
//! ```text
//! output precondition → template check → scan → process → manifest → template → [optimize]
//! ```
//!
//! Nothing is written until the input has been scanned and validated, so an
//! invalid input never leaves a partial output directory behind. Later
//! failures leave whatever was already written; there is no rollback.
//!
//! Every failure carries an [`ErrorCategory`] and a distinct exit status; the
//! binary prints the message and exits with [`GalleryError::exit_code`].

use crate::config::{ConfigError, GalleryConfig};
use crate::imaging::{ImageBackend, RustBackend};
use crate::manifest::{self, ManifestError};
use crate::optimize::{self, OptimizeError, OptimizeReport};
use crate::process::{self, ProcessConfig, ProcessError, ProcessEvent};
use crate::scan::{self, GalleryInput, ScanError};
use crate::template::{self, TemplateError, TemplateReport};
use crate::types::Collection;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad paths, flags or config values.
    Configuration,
    /// The input (or output precondition) breaks the directory contract.
    Validation,
    /// A read, write, copy or codec failure.
    Io,
    /// The template document is not shaped as required.
    Structural,
}

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
    #[error("Error creating output folder \"{}\": {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error creating output folder \"{}\": Not a directory", .0.display())]
    OutputNotADirectory(PathBuf),
    #[error("Error reading output folder \"{}\": {source}", .path.display())]
    OutputUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Output folder \"{}\" is not empty", .0.display())]
    OutputNotEmpty(PathBuf),
}

impl GalleryError {
    pub fn exit_code(&self) -> i32 {
        match self {
            GalleryError::Config(e) => e.exit_code(),
            GalleryError::Scan(e) => e.exit_code(),
            GalleryError::Process(e) => e.exit_code(),
            GalleryError::Manifest(e) => e.exit_code(),
            GalleryError::Template(e) => e.exit_code(),
            GalleryError::Optimize(e) => e.exit_code(),
            GalleryError::CreateOutput { .. } => 10,
            GalleryError::OutputNotADirectory(_) => 11,
            GalleryError::OutputUnreadable { .. } => 12,
            GalleryError::OutputNotEmpty(_) => 13,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        use ErrorCategory::*;
        match self {
            GalleryError::Config(ConfigError::Read { .. }) => Io,
            GalleryError::Config(_) => Configuration,
            GalleryError::Scan(ScanError::Unreadable { .. }) => Io,
            GalleryError::Scan(_) => Validation,
            GalleryError::Process(_) | GalleryError::Manifest(_) => Io,
            GalleryError::Template(TemplateError::Invalid(_)) => Configuration,
            GalleryError::Template(TemplateError::MissingMarkers(_)) => Structural,
            GalleryError::Template(_) => Io,
            GalleryError::Optimize(OptimizeError::InvalidTag(_)) => Structural,
            GalleryError::Optimize(_) => Io,
            GalleryError::CreateOutput { .. } | GalleryError::OutputUnreadable { .. } => Io,
            GalleryError::OutputNotADirectory(_) => Configuration,
            GalleryError::OutputNotEmpty(_) => Validation,
        }
    }
}

/// Receives progress from a running build.
///
/// Every method defaults to doing nothing.
pub trait Reporter {
    fn scanned(&mut self, _input: &GalleryInput) {}
    fn process_event(&mut self, _event: &ProcessEvent) {}
    fn template_written(&mut self, _report: &TemplateReport) {}
    fn optimized(&mut self, _report: &OptimizeReport) {}
}

/// Reporter that discards everything.
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Everything a build needs.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub template: PathBuf,
    pub config: GalleryConfig,
}

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub input: GalleryInput,
    pub collections: Vec<Collection>,
    pub template: TemplateReport,
    /// Present when optimization ran.
    pub optimize: Option<OptimizeReport>,
}

/// The output path must be absent or an empty directory.
pub fn check_output_dir(path: &Path) -> Result<(), GalleryError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(GalleryError::OutputUnreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !meta.is_dir() {
        return Err(GalleryError::OutputNotADirectory(path.to_path_buf()));
    }
    let mut entries = fs::read_dir(path).map_err(|source| GalleryError::OutputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if entries.next().is_some() {
        return Err(GalleryError::OutputNotEmpty(path.to_path_buf()));
    }
    Ok(())
}

/// Validate input (and the output precondition, when given) without writing.
pub fn check(input: &Path, output: Option<&Path>) -> Result<GalleryInput, GalleryError> {
    if let Some(output) = output {
        check_output_dir(output)?;
    }
    Ok(scan::scan(input)?)
}

/// Build a gallery with the pure Rust backend.
pub fn build(
    options: &BuildOptions,
    reporter: &mut dyn Reporter,
) -> Result<BuildReport, GalleryError> {
    build_with_backend(&RustBackend::new(), options, reporter)
}

/// Build a gallery using a specific backend (allows testing with mock).
pub fn build_with_backend(
    backend: &impl ImageBackend,
    options: &BuildOptions,
    reporter: &mut dyn Reporter,
) -> Result<BuildReport, GalleryError> {
    check_output_dir(&options.output)?;
    template::validate_template_dir(&options.template)?;

    let input = scan::scan(&options.input)?;
    reporter.scanned(&input);

    fs::create_dir_all(&options.output).map_err(|source| GalleryError::CreateOutput {
        path: options.output.clone(),
        source,
    })?;

    let process_config = ProcessConfig::from_gallery_config(&options.config);
    let collections = process::process_with_backend(
        backend,
        &options.output,
        &process_config,
        &input,
        &mut |event| reporter.process_event(&event),
    )?;

    let manifest = manifest::serialize(&collections)?;
    let template = template::materialize(&options.template, &options.output, &manifest)?;
    reporter.template_written(&template);

    let optimize = if options.config.optimize {
        let report = optimize::optimize(&template.index_path, &options.output)?;
        reporter.optimized(&report);
        Some(report)
    } else {
        None
    };

    Ok(BuildReport {
        input,
        collections,
        template,
        optimize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{list_files, write_gallery, write_template};
    use tempfile::TempDir;

    fn options(root: &Path) -> BuildOptions {
        BuildOptions {
            input: root.join("gallery"),
            output: root.join("out"),
            template: root.join("template"),
            config: GalleryConfig::default(),
        }
    }

    /// Records which callbacks fired, in order.
    #[derive(Default)]
    struct RecordingReporter {
        calls: Vec<&'static str>,
    }

    impl Reporter for RecordingReporter {
        fn scanned(&mut self, _input: &GalleryInput) {
            self.calls.push("scanned");
        }
        fn process_event(&mut self, _event: &ProcessEvent) {
            self.calls.push("event");
        }
        fn template_written(&mut self, _report: &TemplateReport) {
            self.calls.push("template");
        }
        fn optimized(&mut self, _report: &OptimizeReport) {
            self.calls.push("optimized");
        }
    }

    #[test]
    fn build_writes_manifest_into_template() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);
        write_template(&tmp.path().join("template"));

        let report =
            build_with_backend(&MockBackend::new(), &options(tmp.path()), &mut SilentReporter)
                .unwrap();

        assert_eq!(report.collections.len(), 1);
        assert!(report.optimize.is_none());
        let index = fs::read_to_string(tmp.path().join("out").join("index.html")).unwrap();
        assert!(index.contains(r#"var c = [{"title":"trip","pictures":[{"picture":"c0/0-p.jpg""#));
    }

    #[test]
    fn reporter_sees_each_stage() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);
        write_template(&tmp.path().join("template"));
        let mut opts = options(tmp.path());
        opts.config.optimize = true;

        let mut reporter = RecordingReporter::default();
        build_with_backend(&MockBackend::new(), &opts, &mut reporter).unwrap();

        assert_eq!(
            reporter.calls,
            vec!["scanned", "event", "event", "event", "event", "template", "optimized"]
        );
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("empty", &["notes.txt"])]);
        write_template(&tmp.path().join("template"));

        let err = build_with_backend(&MockBackend::new(), &options(tmp.path()), &mut SilentReporter)
            .unwrap_err();

        assert_eq!(err.exit_code(), 8);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn non_empty_output_is_rejected_before_scanning() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("keep.txt"), "x").unwrap();

        // No input at all: the output check must fire first
        let err = build_with_backend(&MockBackend::new(), &options(tmp.path()), &mut SilentReporter)
            .unwrap_err();

        assert!(matches!(err, GalleryError::OutputNotEmpty(_)));
        assert_eq!(err.exit_code(), 13);
        assert_eq!(list_files(&out), vec!["keep.txt"]);
    }

    #[test]
    fn existing_empty_output_is_accepted() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);
        write_template(&tmp.path().join("template"));
        fs::create_dir_all(tmp.path().join("out")).unwrap();

        assert!(
            build_with_backend(&MockBackend::new(), &options(tmp.path()), &mut SilentReporter)
                .is_ok()
        );
    }

    #[test]
    fn output_file_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("out"), "x").unwrap();

        let err = check_output_dir(&tmp.path().join("out")).unwrap_err();
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn absent_output_passes_the_check() {
        let tmp = TempDir::new().unwrap();
        assert!(check_output_dir(&tmp.path().join("out")).is_ok());
    }

    #[test]
    fn output_below_a_file_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file"), "x").unwrap();

        let err = check_output_dir(&tmp.path().join("file").join("out")).unwrap_err();
        assert!(matches!(err, GalleryError::OutputUnreadable { .. }));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn missing_template_fails_before_writing() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);

        let err = build_with_backend(&MockBackend::new(), &options(tmp.path()), &mut SilentReporter)
            .unwrap_err();

        assert_eq!(err.exit_code(), 36);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn missing_marker_fails_after_processing() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);
        write_template(&tmp.path().join("template"));
        fs::write(tmp.path().join("template").join("index.html"), "<html></html>").unwrap();

        let err = build_with_backend(&MockBackend::new(), &options(tmp.path()), &mut SilentReporter)
            .unwrap_err();

        assert_eq!(err.exit_code(), 27);
        assert_eq!(err.category(), ErrorCategory::Structural);
        // The copied original exists; no template file does
        assert_eq!(list_files(&tmp.path().join("out")), vec!["c0/0.jpg"]);
    }

    #[test]
    fn backend_failure_maps_to_its_own_code() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);
        write_template(&tmp.path().join("template"));

        let err = build_with_backend(
            &MockBackend::failing_on("bg.jpg"),
            &options(tmp.path()),
            &mut SilentReporter,
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 20);
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn check_validates_without_writing() {
        let tmp = TempDir::new().unwrap();
        write_gallery(&tmp.path().join("gallery"), &["bg.jpg"], &[("trip", &["a.jpg"])]);

        let input = check(&tmp.path().join("gallery"), Some(tmp.path().join("out").as_path())).unwrap();

        assert_eq!(input.picture_count(), 1);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn check_reports_missing_input() {
        let tmp = TempDir::new().unwrap();
        let err = check(&tmp.path().join("nope"), None).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
