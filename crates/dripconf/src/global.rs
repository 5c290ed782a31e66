//! The process-wide default container

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::Config;

static GLOBAL: LazyLock<Mutex<Config>> = LazyLock::new(|| Mutex::new(Config::new()));

/// Lock the process-wide default configuration.
///
/// Applications that do not want to pass a [`Config`] around merge into
/// and configure this one at startup. A panic while the lock was held does
/// not make the container unusable.
///
/// ```
/// let mut config = dripconf::global();
/// config.merge(r#"{"service": {"name": "demo"}}"#).unwrap();
/// assert_eq!(config["service"]["name"], "demo");
/// ```
pub fn global() -> MutexGuard<'static, Config> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}
