//! Layered configuration for services
//!
//! A [`Config`] starts empty and is built up by merging overlays: Rust
//! data, INI files, JSON (comments allowed) or YAML. Nested mappings are
//! merged key by key, so a later overlay only has to mention the keys it
//! changes. Everything else (sequences, scalars) is replaced outright.
//!
//! Once loaded, [`Config::configure`] runs the registered [`Trigger`]s in
//! order. Each one validates and normalizes its part of the tree, writes the
//! result back, and then sets something up from it. Values built by a
//! trigger can be published through an [`InjectionSlot`] for code that is
//! loaded before configuration runs.
//!
//! ```
//! use dripconf::{Config, Filename, EnvVar};
//! use serde_json::json;
//!
//! let mut config = Config::new();
//! config.merge(json!({"server": {"host": "0.0.0.0", "port": 8080}})).unwrap();
//! config.merge("server:\n  port: 9090\n").unwrap();
//!
//! assert_eq!(config["server"]["host"], "0.0.0.0");
//! assert_eq!(config["server"]["port"], 9090);
//!
//! // only the first source that exists is merged
//! let missing = config.merge_from(&[&EnvVar::new("DRIPCONF_DOC_UNSET"), &Filename::new("/nope.ini")]);
//! assert!(missing.is_err());
//! ```

pub mod coerce;
pub mod config;
pub mod error;
pub mod global;
pub mod inject;
pub mod input;
pub mod node;
pub mod source;
pub mod trigger;
pub mod value;

pub use config::{Config, MAIN_SECTION};
pub use error::{Error, FieldFailure, Result};
pub use global::global;
pub use inject::{Injected, InjectionSlot, Placeholder};
pub use input::MergeInput;
pub use node::ConfigNode;
pub use source::{Argv, ConfigSource, EnvVar, Filename};
pub use trigger::{SchemaTrigger, Trigger};
pub use value::{ConfigValue, configify};

pub use dripconf_formats::{Format, Section, Sections};
