//! Inputs accepted by [`Config::merge`](crate::Config::merge)

use std::path::{Path, PathBuf};

use dripconf_formats::Sections;

use crate::node::ConfigNode;
use crate::value::ConfigValue;

/// The shapes `merge` knows how to ingest
///
/// Conversions classify data once, up front. Anything that is neither a
/// mapping, parsed sections nor text ends up as [`MergeInput::Unrecognized`]
/// and makes `merge` fail.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeInput {
    /// An already wrapped mapping
    Mapping(ConfigNode),
    /// Parsed INI sections
    Sections(Sections),
    /// A filename or inline JSON/YAML text
    Text(String),
    /// Data of a shape that cannot be merged
    Unrecognized(ConfigValue),
}

impl From<ConfigNode> for MergeInput {
    fn from(node: ConfigNode) -> Self {
        Self::Mapping(node)
    }
}

impl From<Sections> for MergeInput {
    fn from(sections: Sections) -> Self {
        Self::Sections(sections)
    }
}

impl From<&str> for MergeInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MergeInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&Path> for MergeInput {
    fn from(path: &Path) -> Self {
        Self::Text(path.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for MergeInput {
    fn from(path: PathBuf) -> Self {
        Self::from(path.as_path())
    }
}

impl From<ConfigValue> for MergeInput {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Node(node) => Self::Mapping(node),
            ConfigValue::String(text) => Self::Text(text),
            other => Self::Unrecognized(other),
        }
    }
}

impl From<serde_json::Value> for MergeInput {
    fn from(value: serde_json::Value) -> Self {
        Self::from(ConfigValue::from(value))
    }
}

impl From<serde_yaml::Value> for MergeInput {
    fn from(value: serde_yaml::Value) -> Self {
        Self::from(ConfigValue::from(value))
    }
}
