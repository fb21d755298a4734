//! Output layout naming.
//!
//! Every generated file gets a short, deterministic name derived only from its
//! position in the input ordering, rendered in base 36:
//!
//! ```text
//! out/
//! ├── b/
//! │   ├── 0.jpg          # background 0
//! │   └── 1.jpg          # background 1
//! ├── c0/                # collection 0
//! │   ├── 0.jpg          # picture 0, verbatim copy
//! │   ├── 0-p.jpg        # picture 0, display derivative
//! │   └── 0-t.jpg        # picture 0, thumbnail derivative
//! └── ca/                # collection 10
//! ```
//!
//! Paths are returned as `/`-joined strings so the manifest is identical on
//! every platform; [`to_output_path`] turns one into a native path.

use std::path::{Path, PathBuf};

/// Subfolder holding the shared backgrounds.
pub const BACKGROUNDS_DIR: &str = "b";

/// Extension of every generated file.
pub const PICTURE_EXTENSION: &str = "jpg";

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render `n` in base 36 with lowercase digits (`35` → `"z"`, `36` → `"10"`).
pub fn base36(mut n: usize) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from(DIGITS[n % 36]));
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// The role a picture file plays within its collection folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureRole {
    Fullsize,
    Display,
    Thumbnail,
}

impl PictureRole {
    fn suffix(self) -> &'static str {
        match self {
            PictureRole::Fullsize => "",
            PictureRole::Display => "-p",
            PictureRole::Thumbnail => "-t",
        }
    }
}

/// Relative path of background `index`: `b/{idx}.jpg`.
pub fn background_path(index: usize) -> String {
    format!(
        "{}/{}.{}",
        BACKGROUNDS_DIR,
        base36(index),
        PICTURE_EXTENSION
    )
}

/// Relative folder of collection `index`: `c{idx}`.
pub fn collection_dir(index: usize) -> String {
    format!("c{}", base36(index))
}

/// Relative path of one picture artifact: `c{col}/{idx}{suffix}.jpg`.
pub fn picture_path(collection: usize, picture: usize, role: PictureRole) -> String {
    format!(
        "{}/{}{}.{}",
        collection_dir(collection),
        base36(picture),
        role.suffix(),
        PICTURE_EXTENSION
    )
}

/// Join a `/`-separated relative path onto `root` component by component.
pub fn to_output_path(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}
