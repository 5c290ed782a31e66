//! The ordered configuration mapping and the merge engine

use std::ops::Index;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::value::{self, ConfigValue};
use crate::Result;

/// An ordered mapping from key to [`ConfigValue`]
///
/// Keys are unique and keep their insertion order, so a tree serializes
/// the same way every time it is built from the same inputs. Lookups go
/// through [`get`](Self::get), [`get_path`](Self::get_path) or indexing;
/// missing keys index to [`ConfigValue::Null`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigNode {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node from nested data.
    ///
    /// Fails with [`Error::UnrecognizedInput`](crate::Error::UnrecognizedInput)
    /// when the data is not a mapping at the top level.
    pub fn from_data(data: impl Into<ConfigValue>) -> Result<Self> {
        Self::try_from(data.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries.get_mut(key)
    }

    /// Nested node stored at `key`, if that value is a mapping.
    pub fn get_node(&self, key: &str) -> Option<&ConfigNode> {
        self.get(key).and_then(ConfigValue::as_node)
    }

    /// Look up a dotted path such as `"some_service.credentials.username"`.
    ///
    /// Segments that address a sequence are parsed as zero-based indexes,
    /// so `"y.w.2.v"` walks into the third element of `y.w`.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                ConfigValue::Node(node) => node.get(segment)?,
                ConfigValue::Sequence(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Set a value directly, without merging.
    ///
    /// Replaces any existing value at `key` in place, keeping its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &ConfigValue> {
        self.entries.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }

    /// Merge `incoming` into this node.
    ///
    /// For every incoming key: when both the incoming and the existing value
    /// are mappings they are merged recursively, so keys only present on
    /// one side survive. In every other case the incoming value replaces the
    /// existing one outright; sequences are never merged element-wise and a
    /// mapping may replace a scalar (or the reverse).
    ///
    /// Merging the same node twice leaves the same tree as merging it once.
    ///
    /// # Example
    ///
    /// ```
    /// use dripconf::ConfigNode;
    /// use serde_json::json;
    ///
    /// let mut node = ConfigNode::try_from(json!({"b": {"c": 2, "d": 3, "f": [5, 6]}})).unwrap();
    /// node.merge_dict(ConfigNode::try_from(json!({"b": {"c": 22, "f": [7, 8]}})).unwrap());
    ///
    /// assert_eq!(node["b"]["c"], 22);
    /// assert_eq!(node["b"]["d"], 3);
    /// assert_eq!(node["b"]["f"], vec![7, 8]);
    /// ```
    pub fn merge_dict(&mut self, incoming: ConfigNode) {
        for (key, value) in incoming.entries {
            match value {
                ConfigValue::Node(nested) => match self.entries.get_mut(&key) {
                    Some(ConfigValue::Node(existing)) => existing.merge_dict(nested),
                    _ => {
                        self.entries.insert(key, ConfigValue::Node(nested));
                    }
                },
                other => {
                    self.entries.insert(key, other);
                }
            }
        }
    }

    /// Deserialize the whole node into a typed view.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }

    pub(crate) fn without_nulls(&self) -> Self {
        self.iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.without_nulls()))
            .collect()
    }
}

impl Index<&str> for ConfigNode {
    type Output = ConfigValue;

    fn index(&self, key: &str) -> &ConfigValue {
        self.get(key).unwrap_or(value::null())
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigNode {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ConfigNode {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
