//! Built-in configuration triggers
//!
//! - [`LoggingTrigger`] installs the process `tracing` subscriber from an
//!   optional `logging` section
//! - [`StatsdTrigger`] validates an optional `statsd` section and publishes
//!   the client defaults through [`STATSD`]
//!
//! [`register_all`] registers both, logging first.

pub mod ident;
pub mod logging;
pub mod statsd;

use dripconf::Config;

pub use ident::process_ident;
pub use logging::{LogFormat, LogLevel, LoggingSection, LoggingTrigger};
pub use statsd::{STATSD, StatsdDefaults, StatsdSection, StatsdTrigger};

/// Register every built-in trigger on `config`.
pub fn register_all(config: &mut Config) {
    config.register_trigger(LoggingTrigger::new());
    config.register_trigger(StatsdTrigger::new());
}
