//! Lenient field deserializers for schema structs
//!
//! INI files only carry strings, and values copied out of environment or
//! YAML sometimes arrive quoted. These helpers accept either the native
//! type or a string that parses into it:
//!
//! ```
//! use dripconf::coerce;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Statsd {
//!     #[serde(deserialize_with = "coerce::int")]
//!     port: u16,
//!     #[serde(default, deserialize_with = "coerce::boolean")]
//!     enabled: bool,
//! }
//!
//! let parsed: Statsd = serde_json::from_str(r#"{"port": "8125", "enabled": "yes"}"#).unwrap();
//! assert_eq!(parsed.port, 8125);
//! assert!(parsed.enabled);
//! ```

use std::fmt::Display;

use serde::de::{Deserialize, Deserializer, Error};

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn loose<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Loose, D::Error> {
    Loose::deserialize(deserializer)
}

fn narrow<T, E>(value: i64) -> Result<T, E>
where
    T: TryFrom<i64>,
    T::Error: Display,
    E: Error,
{
    T::try_from(value).map_err(|e| E::custom(format!("integer {value} out of range: {e}")))
}

/// An integer, or a string holding one.
pub fn int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
    T::Error: Display,
{
    match loose(deserializer)? {
        Loose::Int(i) => narrow(i),
        Loose::Text(s) => {
            let parsed = s
                .trim()
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("expected an integer, found '{s}'")))?;
            narrow(parsed)
        }
        Loose::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => narrow(f as i64),
        Loose::Float(f) => Err(D::Error::custom(format!("expected an integer, found {f}"))),
        Loose::Bool(b) => Err(D::Error::custom(format!("expected an integer, found {b}"))),
    }
}

/// Like [`int`], for `Option` fields; `null` stays `None`.
///
/// Combine with `#[serde(default)]` so a missing key is `None` as well.
pub fn optional_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
    T::Error: Display,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Maybe {
        Missing(()),
        Present(Loose),
    }

    match Maybe::deserialize(deserializer)? {
        Maybe::Missing(()) => Ok(None),
        Maybe::Present(Loose::Int(i)) => narrow(i).map(Some),
        Maybe::Present(Loose::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, found '{s}'")))
            .and_then(narrow)
            .map(Some),
        Maybe::Present(other) => Err(D::Error::custom(format!(
            "expected an integer, found {}",
            describe(&other)
        ))),
    }
}

/// A float, an integer, or a string holding either.
pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        Loose::Float(f) => Ok(f),
        Loose::Int(i) => Ok(i as f64),
        Loose::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, found '{s}'"))),
        Loose::Bool(b) => Err(D::Error::custom(format!("expected a number, found {b}"))),
    }
}

/// A boolean, `0`/`1`, or one of `true/false`, `yes/no`, `on/off`, `1/0`
/// in any letter case.
pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        Loose::Bool(b) => Ok(b),
        Loose::Int(0) => Ok(false),
        Loose::Int(1) => Ok(true),
        Loose::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(D::Error::custom(format!("expected a boolean, found '{s}'"))),
        },
        other => Err(D::Error::custom(format!(
            "expected a boolean, found {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &Loose) -> String {
    match value {
        Loose::Bool(b) => b.to_string(),
        Loose::Int(i) => i.to_string(),
        Loose::Float(f) => f.to_string(),
        Loose::Text(s) => format!("'{s}'"),
    }
}
