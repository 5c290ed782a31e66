//! Shared test utilities for the dripconf workspace.
//!
//! Dev-dependency only, never published. Use it from `tests/` directories;
//! unit tests inside `dripconf` itself would see a second copy of its types.
//!
//! # Modules
//!
//! - [`dir`]: [`ConfigDir`] temporary directory with configuration files
//! - [`recording`]: [`RecordingTrigger`] that logs every call it receives

pub mod dir;
pub mod recording;

pub use dir::ConfigDir;
pub use recording::{CallLog, RecordingTrigger};
