//! YAML parsing

use serde_yaml::Value;

use crate::{Error, Format, Result};

/// Parse a YAML document, keeping mapping keys in document order.
pub fn parse(source: &str) -> Result<Value> {
    serde_yaml::from_str(source).map_err(|e| match e.location() {
        Some(location) => Error::parse_at(Format::Yaml, location.line(), e.to_string()),
        None => Error::parse(Format::Yaml, e.to_string()),
    })
}
