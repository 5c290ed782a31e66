//! Error types for dripconf

use std::fmt;

/// Result type for dripconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single rejected key reported by a validation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Dotted path of the offending key, e.g. `some_service.pool_size`
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_expected(expected: &Option<&'static str>) -> String {
    match expected {
        Some(name) => format!("A non-degenerate {name} instance"),
        None => "A non-degenerate object".to_string(),
    }
}

/// Errors that can occur in dripconf operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `merge` could not classify its input as any supported shape or format
    #[error("Couldn't merge {value} of type {kind}")]
    UnrecognizedInput { value: String, kind: String },

    /// Every source handed to `merge_from` was unusable
    #[error("No valid configuration sources found ({tried} tried)")]
    NoUsableSource { tried: usize },

    /// A trigger's clean step rejected its section of the configuration
    #[error("Validation failed for '{section}': {}", join_failures(.failures))]
    Validation {
        section: String,
        failures: Vec<FieldFailure>,
    },

    /// A placeholder was used before a trigger injected the real value
    #[error(
        "This object is a placeholder. {} was supposed to be injected by a configuration trigger",
        describe_expected(.expected)
    )]
    PrematureUse { expected: Option<&'static str> },

    /// A trigger's configure step failed
    #[error("Trigger {trigger} failed: {message}")]
    Trigger { trigger: String, message: String },

    /// Parse or read failure from the format adapters
    #[error(transparent)]
    Format(#[from] dripconf_formats::Error),

    /// Typed conversion of a configuration tree failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(section: impl Into<String>, failures: Vec<FieldFailure>) -> Self {
        Self::Validation {
            section: section.into(),
            failures,
        }
    }

    pub fn trigger(trigger: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Trigger {
            trigger: trigger.into(),
            message: message.to_string(),
        }
    }

    /// Failures carried by a validation error, empty for every other kind.
    pub fn failures(&self) -> &[FieldFailure] {
        match self {
            Self::Validation { failures, .. } => failures,
            _ => &[],
        }
    }
}
