//! Manifest serialization.
//!
//! The manifest is the collection list itself, as compact JSON. It is spliced
//! into a JavaScript context inside the template, so no pretty-printing and no
//! wrapping object:
//!
//! ```json
//! [{"title":"trip","pictures":[{"picture":"c0/0-p.jpg","fullsize":"c0/0.jpg","thumb":"c0/0-t.jpg"}],"backgrounds":["b/0.jpg"]}]
//! ```
//!
//! Optional fields that are `None` are omitted rather than written as `null`.

use crate::types::Collection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Could not serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Could not parse manifest: {0}")]
    Parse(#[source] serde_json::Error),
}

impl ManifestError {
    pub fn exit_code(&self) -> i32 {
        23
    }
}

/// Serialize the collection list to the bytes spliced into the template.
pub fn serialize(collections: &[Collection]) -> Result<Vec<u8>, ManifestError> {
    serde_json::to_vec(collections).map_err(ManifestError::Serialize)
}

/// Inverse of [`serialize`].
pub fn parse(bytes: &[u8]) -> Result<Vec<Collection>, ManifestError> {
    serde_json::from_slice(bytes).map_err(ManifestError::Parse)
}
