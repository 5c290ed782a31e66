//! [`RecordingTrigger`] for asserting trigger order and visibility.

use std::sync::{Arc, Mutex};

use dripconf::{ConfigNode, Result, Trigger};

/// Shared log of trigger calls, in the order they happened
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// A trigger that records its calls and contributes a fixed node on clean
///
/// Entries look like `"clean <name>"` and `"configure <name>"`.
pub struct RecordingTrigger {
    name: String,
    contributes: ConfigNode,
    log: CallLog,
    snapshots: Arc<Mutex<Vec<ConfigNode>>>,
}

impl RecordingTrigger {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            contributes: ConfigNode::new(),
            log: Arc::clone(log),
            snapshots: Arc::default(),
        }
    }

    /// Return `node` from every `clean` call.
    pub fn contributing(mut self, node: ConfigNode) -> Self {
        self.contributes = node;
        self
    }

    /// Handle to the trees this trigger saw in `configure`, which stays
    /// readable after the trigger is moved into a `Config`.
    pub fn snapshots(&self) -> Arc<Mutex<Vec<ConfigNode>>> {
        Arc::clone(&self.snapshots)
    }

    pub fn log() -> CallLog {
        Arc::default()
    }
}

impl Trigger for RecordingTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn clean(&self, _config: &ConfigNode) -> Result<ConfigNode> {
        self.log.lock().unwrap().push(format!("clean {}", self.name));
        Ok(self.contributes.clone())
    }

    fn configure(&self, config: &ConfigNode) -> Result<()> {
        self.log.lock().unwrap().push(format!("configure {}", self.name));
        self.snapshots.lock().unwrap().push(config.clone());
        Ok(())
    }
}
