//! Gallery configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Stock defaults (below)
//! 2. An optional TOML file given with `--config`
//! 3. Command-line flags
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! optimize = false          # Inline CSS/JS and strip comments in index.html
//!
//! [sizes]
//! thumbnail = "960x540"     # Bounding box of -t.jpg derivatives
//! display = "2560x1440"     # Bounding box of -p.jpg derivatives
//! background = "2560x1440"  # Bounding box of b/*.jpg
//!
//! [images]
//! quality = 70              # JPEG quality (1-100)
//! filter = "lanczos3"       # lanczos3 | gaussian | nearest | cubic | linear
//! titles_from_filenames = false
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; list only the values you want to change:
//!
//! ```toml
//! [sizes]
//! thumbnail = "480x270"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ResizeFilter;
use crate::types::{Size, SizeParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which of the three bounding boxes a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField {
    Thumbnail,
    Display,
    Background,
}

impl fmt::Display for SizeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeField::Thumbnail => "thumbnail",
            SizeField::Display => "display",
            SizeField::Background => "background",
        })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {field} size: {source}")]
    Size {
        field: SizeField,
        source: SizeParseError,
    },
    #[error("Expected exactly one input directory, got {0}")]
    InputCount(usize),
    #[error("No output directory given")]
    MissingOutput,
    #[error("No template directory given")]
    MissingTemplate,
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Could not read config file \"{}\": {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file \"{}\": {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Deserialize(#[from] toml::de::Error),
    #[error("Could not render stock config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Size { field, .. } => match field {
                SizeField::Thumbnail => 1,
                SizeField::Display => 2,
                SizeField::Background => 3,
            },
            ConfigError::InputCount(_) => 4,
            ConfigError::MissingOutput => 24,
            ConfigError::Validation(_) | ConfigError::Serialize(_) => 25,
            ConfigError::MissingTemplate => 36,
            ConfigError::Read { .. } => 37,
            ConfigError::Toml { .. } | ConfigError::Deserialize(_) => 38,
        }
    }
}

/// Gallery configuration.
///
/// All fields have defaults; a config file need only list what it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Run the HTML optimizer over the generated `index.html`.
    pub optimize: bool,
    /// Bounding boxes of the generated derivatives.
    pub sizes: SizesConfig,
    /// Encoding settings.
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizesConfig {
    pub thumbnail: Size,
    pub display: Size,
    pub background: Size,
}

impl Default for SizesConfig {
    fn default() -> Self {
        Self {
            thumbnail: Size {
                width: 960,
                height: 540,
            },
            display: Size {
                width: 2560,
                height: 1440,
            },
            background: Size {
                width: 2560,
                height: 1440,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    pub filter: ResizeFilter,
    /// Use each picture's file stem as its title in the manifest.
    pub titles_from_filenames: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 70,
            filter: ResizeFilter::default(),
            titles_from_filenames: false,
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file config.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        let sizes = [
            (SizeField::Thumbnail, &overrides.thumbnail, &mut self.sizes.thumbnail),
            (SizeField::Display, &overrides.display, &mut self.sizes.display),
            (SizeField::Background, &overrides.background, &mut self.sizes.background),
        ];
        for (field, value, target) in sizes {
            if let Some(value) = value {
                *target = value
                    .parse()
                    .map_err(|source| ConfigError::Size { field, source })?;
            }
        }
        if let Some(quality) = overrides.quality {
            self.images.quality = quality;
        }
        if let Some(filter) = overrides.filter {
            self.images.filter = filter;
        }
        self.images.titles_from_filenames |= overrides.titles_from_filenames;
        self.optimize |= overrides.optimize;
        Ok(())
    }
}

/// Values given on the command line. `None`/`false` leaves the config as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Raw `WIDTHxHEIGHT` strings, parsed in [`GalleryConfig::apply`].
    pub thumbnail: Option<String>,
    pub display: Option<String>,
    pub background: Option<String>,
    pub quality: Option<u32>,
    pub filter: Option<ResizeFilter>,
    pub titles_from_filenames: bool,
    pub optimize: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer every user override is merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, overlaid with `path` if given.
pub fn load_config(path: Option<&Path>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Static Gallery Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass the file with --config. Command-line flags override its values.
# Unknown keys will cause an error.

# Inline stylesheets and scripts into index.html, minify them and strip
# HTML comments after the template has been copied.
optimize = false

# ---------------------------------------------------------------------------
# Bounding boxes (WIDTHxHEIGHT)
# ---------------------------------------------------------------------------
# Pictures are scaled down to fit, keeping their aspect ratio.
# Pictures that already fit are re-encoded at their original size.
[sizes]
thumbnail = "960x540"
display = "2560x1440"
background = "2560x1440"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[images]
# JPEG quality for every generated derivative (1 = worst, 100 = best).
quality = 70

# Resampling filter: lanczos3, gaussian, nearest, cubic or linear.
filter = "lanczos3"

# Add each picture's file name (without extension) as its title.
titles_from_filenames = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn size(s: &str) -> Size {
        s.parse().unwrap()
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn default_config_values() {
        let config = GalleryConfig::default();
        assert!(!config.optimize);
        assert_eq!(config.sizes.thumbnail, size("960x540"));
        assert_eq!(config.sizes.display, size("2560x1440"));
        assert_eq!(config.sizes.background, size("2560x1440"));
        assert_eq!(config.images.quality, 70);
        assert_eq!(config.images.filter, ResizeFilter::Lanczos3);
        assert!(!config.images.titles_from_filenames);
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let parsed: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, GalleryConfig::default());
    }

    #[test]
    fn stock_defaults_value_is_a_table() {
        let value = stock_defaults_value().unwrap();
        assert_eq!(
            value["sizes"]["thumbnail"].as_str(),
            Some("960x540")
        );
        assert_eq!(value["images"]["filter"].as_str(), Some("lanczos3"));
    }

    // =========================================================================
    // Parsing and merging
    // =========================================================================

    #[test]
    fn partial_config_keeps_other_defaults() {
        let overlay: toml::Value = toml::from_str("[sizes]\nthumbnail = \"480x270\"").unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.sizes.thumbnail, size("480x270"));
        assert_eq!(config.sizes.display, size("2560x1440"));
        assert_eq!(config.images.quality, 70);
    }

    #[test]
    fn merge_toml_overrides_nested_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n[b]\nz = 4").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
        assert_eq!(merged["b"]["z"].as_integer(), Some(4));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let overlay: toml::Value = toml::from_str("[images]\nqualty = 80").unwrap();
        let err = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize(_)));
        assert_eq!(err.exit_code(), 38);
    }

    #[test]
    fn malformed_size_in_file_is_rejected() {
        let overlay: toml::Value = toml::from_str("[sizes]\ndisplay = \"big\"").unwrap();
        assert!(resolve_config(stock_defaults_value().unwrap(), Some(overlay)).is_err());
    }

    #[test]
    fn quality_out_of_range_fails_validation() {
        let overlay: toml::Value = toml::from_str("[images]\nquality = 0").unwrap();
        let err = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(err.exit_code(), 25);
    }

    #[test]
    fn filter_parses_lowercase_name() {
        let overlay: toml::Value = toml::from_str("[images]\nfilter = \"nearest\"").unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();
        assert_eq!(config.images.filter, ResizeFilter::Nearest);
    }

    // =========================================================================
    // File loading
    // =========================================================================

    #[test]
    fn load_config_without_file_is_stock() {
        assert_eq!(load_config(None).unwrap(), GalleryConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.toml");
        fs::write(&path, "optimize = true\n[images]\nquality = 85\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert!(config.optimize);
        assert_eq!(config.images.quality, 85);
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(tmp.path().join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.exit_code(), 37);
    }

    #[test]
    fn invalid_toml_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.toml");
        fs::write(&path, "[sizes\n").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert_eq!(err.exit_code(), 38);
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn overrides_replace_file_values() {
        let mut config = GalleryConfig::default();
        config
            .apply(&Overrides {
                thumbnail: Some("100x100".to_string()),
                quality: Some(90),
                filter: Some(ResizeFilter::Cubic),
                optimize: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.sizes.thumbnail, size("100x100"));
        assert_eq!(config.sizes.display, size("2560x1440"));
        assert_eq!(config.images.quality, 90);
        assert_eq!(config.images.filter, ResizeFilter::Cubic);
        assert!(config.optimize);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let mut config = GalleryConfig {
            optimize: true,
            ..Default::default()
        };
        config.apply(&Overrides::default()).unwrap();
        assert!(config.optimize);
    }

    #[test]
    fn malformed_size_flags_have_distinct_codes() {
        let cases = [
            (
                Overrides {
                    thumbnail: Some("960".to_string()),
                    ..Default::default()
                },
                1,
            ),
            (
                Overrides {
                    display: Some("0x10".to_string()),
                    ..Default::default()
                },
                2,
            ),
            (
                Overrides {
                    background: Some("10xten".to_string()),
                    ..Default::default()
                },
                3,
            ),
        ];
        for (overrides, code) in cases {
            let err = GalleryConfig::default().apply(&overrides).unwrap_err();
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn size_error_names_the_field() {
        let err = GalleryConfig::default()
            .apply(&Overrides {
                display: Some("axb".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid display size: Invalid resolution width: \"a\""
        );
    }
}
