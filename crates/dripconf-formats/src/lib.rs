//! Format adapters for dripconf
//!
//! Turns raw configuration text into parsed trees that the core container
//! knows how to merge:
//!
//! - [`Sections`] for INI-style `key = value` files
//! - [`jsonc`] for JSON that may carry `//` and `/* */` comments
//! - [`yaml`] for YAML documents
//!
//! Nothing here knows about merging. Each adapter either returns a complete
//! parse or an [`Error`], so callers can parse first and mutate afterwards.

pub mod error;
pub mod format;
pub mod ini;
pub mod io;
pub mod jsonc;
pub mod yaml;

pub use error::{Error, Result};
pub use format::Format;
pub use ini::{Section, Sections};
pub use io::read_text;
