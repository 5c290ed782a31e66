//! Statsd client defaults from the `statsd` section
//!
//! ```json
//! {"statsd": {"host": "graphite.example.net", "port": 8129}}
//! ```
//!
//! Metric emitters read the resolved defaults from [`STATSD`] once
//! configuration has run.

use dripconf::{ConfigNode, InjectionSlot, Result, SchemaTrigger, Trigger, coerce};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::process_ident;

pub const SECTION: &str = "statsd";
pub const DEFAULT_PORT: u16 = 8125;

/// Defaults published by [`StatsdTrigger`]; a placeholder until then.
pub static STATSD: InjectionSlot<StatsdDefaults> = InjectionSlot::new("StatsdDefaults");

/// Typed view of the `statsd` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StatsdSection {
    #[validate(length(min = 1, message = "host must not be empty"))]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, message = "port must be between 1 and 65535"))]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Connection defaults for statsd clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsdDefaults {
    pub host: String,
    pub port: u16,
    /// Metric name prefix; the process identity unless configured
    pub prefix: String,
}

impl StatsdDefaults {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<StatsdSection> for StatsdDefaults {
    fn from(section: StatsdSection) -> Self {
        Self {
            host: section.host,
            port: section.port,
            prefix: section.prefix.unwrap_or_else(process_ident),
        }
    }
}

/// Validates the `statsd` section and publishes [`StatsdDefaults`]
pub struct StatsdTrigger {
    schema: SchemaTrigger<StatsdSection>,
}

impl Default for StatsdTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsdTrigger {
    pub fn new() -> Self {
        Self {
            schema: SchemaTrigger::new(SECTION),
        }
    }
}

impl Trigger for StatsdTrigger {
    fn name(&self) -> &str {
        SECTION
    }

    fn clean(&self, config: &ConfigNode) -> Result<ConfigNode> {
        self.schema.clean(config)
    }

    fn configure(&self, config: &ConfigNode) -> Result<()> {
        if let Some(section) = self.schema.validate(config)? {
            let defaults = StatsdDefaults::from(section);
            info!(address = %defaults.address(), prefix = %defaults.prefix, "Statsd defaults set");
            STATSD.inject(defaults);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripconf::Error;
    use rstest::rstest;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigNode {
        ConfigNode::try_from(value).unwrap()
    }

    #[test]
    fn test_clean_defaults_port() {
        let cleaned = StatsdTrigger::new()
            .clean(&tree(json!({"statsd": {"host": "graphite"}})))
            .unwrap();
        assert_eq!(cleaned["statsd"]["port"], 8125);
        assert!(!cleaned["statsd"].as_node().unwrap().contains_key("prefix"));
    }

    #[test]
    fn test_clean_coerces_port_string() {
        let cleaned = StatsdTrigger::new()
            .clean(&tree(json!({"statsd": {"host": "graphite", "port": "8129"}})))
            .unwrap();
        assert_eq!(cleaned["statsd"]["port"], 8129);
    }

    #[rstest]
    #[case(json!({"statsd": {"port": 8125}}), "statsd")]
    #[case(json!({"statsd": {"host": "", "port": 8125}}), "statsd.host")]
    #[case(json!({"statsd": {"host": "h", "port": 0}}), "statsd.port")]
    #[case(json!({"statsd": {"host": "h", "port": 70000}}), "statsd.port")]
    #[case(json!({"statsd": {"host": "h", "port": "eighty"}}), "statsd.port")]
    #[case(json!({"statsd": {"host": 7}}), "statsd.host")]
    fn test_clean_rejects(#[case] input: serde_json::Value, #[case] field: &str) {
        let err = StatsdTrigger::new().clean(&tree(input)).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.failures()[0].field, field);
    }

    #[test]
    fn test_prefix_defaults_to_process_ident() {
        let section = StatsdSection {
            host: "h".to_string(),
            port: 1,
            prefix: None,
        };
        let defaults = StatsdDefaults::from(section);
        assert_eq!(defaults.prefix, process_ident());
        assert_eq!(defaults.address(), "h:1");
    }

    #[test]
    fn test_absent_section_publishes_nothing() {
        let trigger = StatsdTrigger::new();
        let config = tree(json!({}));
        assert!(trigger.clean(&config).unwrap().is_empty());
        trigger.configure(&config).unwrap();
    }
}
