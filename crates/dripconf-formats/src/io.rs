//! File reading

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Read text content from a file.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tracing::debug!(?path, "Reading configuration file");
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
