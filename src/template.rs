//! Template materialization.
//!
//! Stage 3 of the build. The template directory is copied file-for-file into
//! the output directory. Its top-level `index.html` must contain a pair of
//! splice markers; everything from the start of the begin marker through the
//! end of the end marker is replaced by the serialized manifest:
//!
//! ```text
//! var collections = /*{{BEGIN:collections*/[]/*END:collections}}*/;
//!                   ^----------- replaced by the manifest ----------^
//! ```
//!
//! `index.html` is read and spliced in memory before any file is copied, so a
//! template with broken markers leaves no template file in the output.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const BEGIN_MARKER: &str = "/*{{BEGIN:collections*/";
pub const END_MARKER: &str = "/*END:collections}}*/";

/// The one template file that receives the manifest.
pub const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template path \"{}\" must be a directory containing {}", .0.display(), INDEX_FILE)]
    Invalid(PathBuf),
    #[error("Could not read template file \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "Template file \"{}\" must contain {} followed by {}",
        .0.display(),
        BEGIN_MARKER,
        END_MARKER
    )]
    MissingMarkers(PathBuf),
    #[error("Could not copy template file \"{}\" to \"{}\": {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl TemplateError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TemplateError::Invalid(_) => 36,
            TemplateError::MissingMarkers(_) => 27,
            TemplateError::Read { .. } | TemplateError::Copy { .. } => 26,
        }
    }
}

/// What materialization wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateReport {
    /// Files written, `index.html` included.
    pub files_copied: usize,
    pub manifest_bytes: usize,
    /// The spliced `index.html` in the output directory.
    pub index_path: PathBuf,
}

/// Replace the marker range of `content` with `manifest`.
///
/// Returns `None` if either marker is missing or the end marker comes first.
/// Only the first occurrence of each marker is considered.
pub fn splice(content: &[u8], manifest: &[u8]) -> Option<Vec<u8>> {
    let begin = find(content, BEGIN_MARKER.as_bytes())?;
    let end = find(content, END_MARKER.as_bytes())?;
    if end < begin + BEGIN_MARKER.len() {
        return None;
    }
    let tail = end + END_MARKER.len();

    let mut out = Vec::with_capacity(content.len() - (tail - begin) + manifest.len());
    out.extend_from_slice(&content[..begin]);
    out.extend_from_slice(manifest);
    out.extend_from_slice(&content[tail..]);
    Some(out)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Check that `template_dir` is usable without touching the output.
pub fn validate_template_dir(template_dir: &Path) -> Result<PathBuf, TemplateError> {
    let index = template_dir.join(INDEX_FILE);
    if !template_dir.is_dir() || !index.is_file() {
        return Err(TemplateError::Invalid(template_dir.to_path_buf()));
    }
    Ok(index)
}

/// Copy the template into `output_dir`, splicing `manifest` into `index.html`.
pub fn materialize(
    template_dir: &Path,
    output_dir: &Path,
    manifest: &[u8],
) -> Result<TemplateReport, TemplateError> {
    let index = validate_template_dir(template_dir)?;
    let content = fs::read(&index).map_err(|source| TemplateError::Read {
        path: index.clone(),
        source,
    })?;
    let spliced =
        splice(&content, manifest).ok_or_else(|| TemplateError::MissingMarkers(index.clone()))?;

    let mut files_copied = 0;
    for entry in WalkDir::new(template_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| TemplateError::Read {
            path: template_dir.to_path_buf(),
            source: e.into(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(template_dir)
            .unwrap_or(entry.path());
        let target = output_dir.join(relative);

        let copy_error = |source| TemplateError::Copy {
            from: entry.path().to_path_buf(),
            to: target.clone(),
            source,
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(copy_error)?;
        } else if entry.path() == index {
            fs::write(&target, &spliced).map_err(copy_error)?;
            files_copied += 1;
        } else {
            fs::copy(entry.path(), &target).map_err(copy_error)?;
            files_copied += 1;
        }
    }

    Ok(TemplateReport {
        files_copied,
        manifest_bytes: manifest.len(),
        index_path: output_dir.join(INDEX_FILE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{list_files, write_template};
    use tempfile::TempDir;

    // =========================================================================
    // splice
    // =========================================================================

    #[test]
    fn splice_replaces_marker_range_inclusive() {
        let content = b"var c = /*{{BEGIN:collections*/[]/*END:collections}}*/;";
        let spliced = splice(content, b"[{\"title\":\"a\"}]").unwrap();
        assert_eq!(spliced, b"var c = [{\"title\":\"a\"}];");
    }

    #[test]
    fn splice_handles_adjacent_markers() {
        let content = b"x/*{{BEGIN:collections*//*END:collections}}*/y";
        assert_eq!(splice(content, b"[]").unwrap(), b"x[]y");
    }

    #[test]
    fn splice_requires_both_markers() {
        assert_eq!(splice(b"/*{{BEGIN:collections*/[]", b"[]"), None);
        assert_eq!(splice(b"[]/*END:collections}}*/", b"[]"), None);
        assert_eq!(splice(b"no markers at all", b"[]"), None);
    }

    #[test]
    fn splice_rejects_misordered_markers() {
        let content = b"/*END:collections}}*/ /*{{BEGIN:collections*/";
        assert_eq!(splice(content, b"[]"), None);
    }

    #[test]
    fn splice_keeps_surrounding_bytes() {
        let content = "<p>é</p>/*{{BEGIN:collections*/old/*END:collections}}*/<p>ü</p>".as_bytes();
        assert_eq!(
            String::from_utf8(splice(content, b"new").unwrap()).unwrap(),
            "<p>é</p>new<p>ü</p>"
        );
    }

    // =========================================================================
    // materialize
    // =========================================================================

    #[test]
    fn materialize_copies_tree_and_splices_index() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("template");
        let output = tmp.path().join("out");
        write_template(&template);
        fs::create_dir_all(&output).unwrap();

        let report = materialize(&template, &output, b"[1]").unwrap();

        assert_eq!(report.files_copied, 2);
        assert_eq!(report.manifest_bytes, 3);
        assert_eq!(list_files(&output), vec!["css/site.css", "index.html"]);
        let index = fs::read_to_string(&report.index_path).unwrap();
        assert!(index.contains("var c = [1];"));
        assert!(!index.contains(BEGIN_MARKER));
    }

    #[test]
    fn nested_index_files_are_copied_verbatim() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("template");
        let output = tmp.path().join("out");
        write_template(&template);
        fs::create_dir_all(template.join("sub")).unwrap();
        fs::write(template.join("sub").join(INDEX_FILE), BEGIN_MARKER).unwrap();

        materialize(&template, &output, b"[]").unwrap();

        assert_eq!(
            fs::read_to_string(output.join("sub").join(INDEX_FILE)).unwrap(),
            BEGIN_MARKER
        );
    }

    #[test]
    fn missing_end_marker_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("template");
        let output = tmp.path().join("out");
        write_template(&template);
        fs::write(
            template.join(INDEX_FILE),
            "<script>/*{{BEGIN:collections*/[]</script>",
        )
        .unwrap();
        fs::create_dir_all(&output).unwrap();

        let err = materialize(&template, &output, b"[]").unwrap_err();

        assert!(matches!(err, TemplateError::MissingMarkers(_)));
        assert_eq!(err.exit_code(), 27);
        assert!(list_files(&output).is_empty());
    }

    #[test]
    fn template_without_index_is_invalid() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("other.html"), "").unwrap();

        let err = materialize(tmp.path(), &tmp.path().join("out"), b"[]").unwrap_err();
        assert!(matches!(err, TemplateError::Invalid(_)));
        assert_eq!(err.exit_code(), 36);
    }

    #[test]
    fn template_path_must_be_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("index.html");
        fs::write(&file, "").unwrap();

        assert!(matches!(
            validate_template_dir(&file),
            Err(TemplateError::Invalid(_))
        ));
    }
}
