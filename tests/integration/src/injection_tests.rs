//! A dependency declared before configuration and injected by a trigger

use dripconf::{Config, ConfigNode, Error, InjectionSlot, Result, Trigger};

static DEPENDENCY: InjectionSlot<i64> = InjectionSlot::new("i64");

struct InjectAnswer;

impl Trigger for InjectAnswer {
    fn clean(&self, config: &ConfigNode) -> Result<ConfigNode> {
        Ok(config.clone())
    }

    fn configure(&self, _config: &ConfigNode) -> Result<()> {
        DEPENDENCY.inject(123);
        Ok(())
    }
}

#[test]
fn test_placeholder_until_configured() {
    let before = format!("{DEPENDENCY:?}");
    assert!(before.contains("Pending"));

    let err = DEPENDENCY.get().unwrap_err();
    assert!(matches!(err, Error::PrematureUse { expected: Some("i64") }));
    assert_eq!(
        err.to_string(),
        "This object is a placeholder. A non-degenerate i64 instance was supposed to be \
         injected by a configuration trigger"
    );

    let mut config = Config::new();
    config.register_trigger(InjectAnswer);
    config.configure().unwrap();

    assert_eq!(*DEPENDENCY.get().unwrap(), 123);
    assert!(!DEPENDENCY.is_placeholder());
}
