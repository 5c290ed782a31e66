//! Configuration values and the node wrapper
//!
//! Every piece of data that enters a [`ConfigNode`] is first converted into
//! a [`ConfigValue`]. The conversion is where classification happens: maps
//! become nodes, sequences become [`ConfigValue::Sequence`] and everything
//! else is a scalar. After that point the merge engine only ever looks at
//! the variant tag.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

use serde::Serialize;

use crate::node::ConfigNode;
use crate::{Error, Result};

/// A configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`; anything smaller is an `Int`
    UInt(u64),
    Float(f64),
    String(String),
    /// Sequences are replaced as a whole by the merge engine, never merged
    Sequence(Vec<ConfigValue>),
    Node(ConfigNode),
}

static NULL: ConfigValue = ConfigValue::Null;

/// Wrap arbitrary nested data as a configuration value.
///
/// Mappings become [`ConfigNode`]s (keeping their key order), sequences
/// become [`ConfigValue::Sequence`] with wrapped elements, scalars are
/// copied. The result owns all of its data.
///
/// # Example
///
/// ```
/// use dripconf::{ConfigValue, configify};
/// use serde_json::json;
///
/// let value = configify(json!({"y": {"w": [1, 2, {"v": 22}]}}));
/// assert_eq!(value["y"]["w"][2]["v"], 22);
/// ```
pub fn configify(data: impl Into<ConfigValue>) -> ConfigValue {
    data.into()
}

impl ConfigValue {
    /// Wrap any serializable value, e.g. a typed settings struct.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Node(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Non-negative integers of either width.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(i) => u64::try_from(*i).ok(),
            Self::UInt(u) => Some(*u),
            _ => None,
        }
    }

    /// Floats, and integers widened to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut ConfigNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Deserialize this value into a typed view.
    pub fn extract<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(serde_json::Value::from(self))?)
    }

    /// Copy of this value with every `Null` removed from nested nodes.
    pub(crate) fn without_nulls(&self) -> Self {
        match self {
            Self::Node(node) => Self::Node(node.without_nulls()),
            Self::Sequence(items) => Self::Sequence(items.iter().map(Self::without_nulls).collect()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            other => {
                let json = serde_json::Value::from(other);
                write!(f, "{json}")
            }
        }
    }
}

/// Missing keys and out-of-range indexes resolve to `Null`, like
/// `serde_json::Value`.
impl Index<&str> for ConfigValue {
    type Output = ConfigValue;

    fn index(&self, key: &str) -> &ConfigValue {
        match self {
            Self::Node(node) => node.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl Index<usize> for ConfigValue {
    type Output = ConfigValue;

    fn index(&self, index: usize) -> &ConfigValue {
        match self {
            Self::Sequence(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

pub(crate) fn null() -> &'static ConfigValue {
    &NULL
}

// --- conversions into the closed value type ---

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(u)) => Self::UInt(u),
                (None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Node(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for ConfigValue {
    fn from(value: &serde_json::Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(u)) => Self::UInt(u),
                (None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Node(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Self::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; configuration keys are always strings.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => ConfigValue::from(other).to_string(),
    }
}

impl From<&ConfigValue> for serde_json::Value {
    fn from(value: &ConfigValue) -> Self {
        use serde_json::Value;
        match value {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(b) => Value::Bool(*b),
            ConfigValue::Int(i) => Value::from(*i),
            ConfigValue::UInt(u) => Value::from(*u),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ConfigValue::String(s) => Value::String(s.clone()),
            ConfigValue::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
            ConfigValue::Node(node) => Value::Object(
                node.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<ConfigNode> for ConfigValue {
    fn from(node: ConfigNode) -> Self {
        Self::Node(node)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConfigValue {
                fn from(i: $ty) -> Self {
                    Self::Int(i64::from(i))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ConfigValue {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Self::UInt(u), Self::Int)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for ConfigValue {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> From<BTreeMap<K, V>> for ConfigValue {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Node(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> From<HashMap<K, V>> for ConfigValue {
    fn from(map: HashMap<K, V>) -> Self {
        Self::Node(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> From<Vec<(K, V)>> for ConfigNode {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl TryFrom<ConfigValue> for ConfigNode {
    type Error = Error;

    fn try_from(value: ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::Node(node) => Ok(node),
            other => Err(Error::UnrecognizedInput {
                value: other.to_string(),
                kind: other.kind().to_string(),
            }),
        }
    }
}

impl TryFrom<serde_json::Value> for ConfigNode {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        ConfigNode::try_from(ConfigValue::from(value))
    }
}

impl TryFrom<serde_yaml::Value> for ConfigNode {
    type Error = Error;

    fn try_from(value: serde_yaml::Value) -> Result<Self> {
        ConfigNode::try_from(ConfigValue::from(value))
    }
}

// --- comparisons against plain scalars, for ergonomic assertions ---

impl PartialEq<i64> for ConfigValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<u64> for ConfigValue {
    fn eq(&self, other: &u64) -> bool {
        self.as_u64() == Some(*other)
    }
}

impl PartialEq<i32> for ConfigValue {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<f64> for ConfigValue {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Self::Float(f) if f == other)
    }
}

impl PartialEq<bool> for ConfigValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<str> for ConfigValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for ConfigValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl<T> PartialEq<Vec<T>> for ConfigValue
where
    ConfigValue: PartialEq<T>,
{
    fn eq(&self, other: &Vec<T>) -> bool {
        match self {
            Self::Sequence(items) => {
                items.len() == other.len() && items.iter().zip(other).all(|(a, b)| a == b)
            }
            _ => false,
        }
    }
}
