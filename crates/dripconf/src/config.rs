//! The configuration container

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use dripconf_formats::{Format, Sections, jsonc, yaml};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::FieldFailure;
use crate::input::MergeInput;
use crate::node::ConfigNode;
use crate::source::ConfigSource;
use crate::trigger::Trigger;
use crate::value::ConfigValue;
use crate::{Error, Result};

/// Section of an INI file whose keys land at the top level
pub const MAIN_SECTION: &str = "main";

/// A configuration tree plus the triggers that act on it
///
/// Dereferences to the root [`ConfigNode`], so lookups read the same as on
/// a plain node:
///
/// ```
/// use dripconf::Config;
/// use serde_json::json;
///
/// let mut config = Config::new();
/// config.merge(json!({"db": {"host": "localhost", "port": 5432}})).unwrap();
/// config.merge(r#"{"db": {"port": 6432}}"#).unwrap();
///
/// assert_eq!(config["db"]["host"], "localhost");
/// assert_eq!(config.get_path("db.port").unwrap(), &6432);
/// ```
///
/// Every `merge_*` method parses its input completely before touching the
/// tree, so a failed call leaves the configuration unchanged.
#[derive(Default)]
pub struct Config {
    root: ConfigNode,
    triggers: Vec<Box<dyn Trigger>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap nested data into a node tree; the data must be a mapping.
    pub fn from_data(data: impl Into<ConfigValue>) -> Result<ConfigNode> {
        ConfigNode::from_data(data)
    }

    pub fn node(&self) -> &ConfigNode {
        &self.root
    }

    pub fn into_node(self) -> ConfigNode {
        self.root
    }

    /// Merge anything `merge` recognizes.
    ///
    /// Text is interpreted in a fixed order: a path ending in `.ini`, a
    /// path ending in `.json`, inline JSON, inline YAML. A path with a
    /// recognized suffix is read as that file and its errors are returned
    /// as-is. Inline text that is neither a JSON nor a YAML mapping fails
    /// with [`Error::UnrecognizedInput`].
    pub fn merge(&mut self, input: impl Into<MergeInput>) -> Result<()> {
        match input.into() {
            MergeInput::Mapping(node) => {
                self.merge_dict(node);
                Ok(())
            }
            MergeInput::Sections(sections) => {
                self.merge_sections(&sections);
                Ok(())
            }
            MergeInput::Text(text) => self.merge_text(&text),
            MergeInput::Unrecognized(value) => Err(Error::UnrecognizedInput {
                value: value.to_string(),
                kind: value.kind().to_string(),
            }),
        }
    }

    fn merge_text(&mut self, text: &str) -> Result<()> {
        let path = Path::new(text);
        if has_suffix(path, Format::Ini) {
            return self.merge_ini_file(path);
        }
        if has_suffix(path, Format::Json) {
            return self.merge_json_file(path);
        }

        match self.merge_json(text) {
            Ok(()) => return Ok(()),
            Err(e) => debug!(error = %e, "Input is not a JSON mapping"),
        }
        match self.merge_yaml(text) {
            Ok(()) => return Ok(()),
            Err(e) => debug!(error = %e, "Input is not a YAML mapping"),
        }

        Err(Error::UnrecognizedInput {
            value: text.to_string(),
            kind: "string".to_string(),
        })
    }

    /// Merge parsed INI sections.
    ///
    /// Options of the `main` section are merged at the top level, every
    /// other section becomes a nested node named after it. Inherited
    /// `DEFAULT` values are included in each section.
    pub fn merge_sections(&mut self, sections: &Sections) {
        let mut incoming = ConfigNode::new();

        if let Some(items) = sections.items(MAIN_SECTION) {
            for (key, value) in items {
                incoming.insert(key, value);
            }
        }
        for section in sections.sections() {
            if section.name() == MAIN_SECTION {
                continue;
            }
            let items = sections.items(section.name()).unwrap_or_default();
            incoming.insert(section.name(), ConfigNode::from(items));
        }

        self.merge_dict(incoming);
    }

    /// Merge INI text.
    pub fn merge_ini(&mut self, text: &str) -> Result<()> {
        let sections = Sections::parse(text)?;
        self.merge_sections(&sections);
        Ok(())
    }

    pub fn merge_ini_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Merging INI file");
        let sections = Sections::read(path)?;
        self.merge_sections(&sections);
        Ok(())
    }

    /// Merge JSON text; `//` and `/* */` comments are allowed.
    pub fn merge_json(&mut self, text: &str) -> Result<()> {
        let node = ConfigNode::try_from(jsonc::parse(text)?)?;
        self.merge_dict(node);
        Ok(())
    }

    pub fn merge_json_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Merging JSON file");
        let text = dripconf_formats::read_text(path)?;
        self.merge_json(&text)
    }

    pub fn merge_yaml(&mut self, text: &str) -> Result<()> {
        let node = ConfigNode::try_from(yaml::parse(text)?)?;
        self.merge_dict(node);
        Ok(())
    }

    pub fn merge_yaml_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Merging YAML file");
        let text = dripconf_formats::read_text(path)?;
        self.merge_yaml(&text)
    }

    /// Merge the first usable source, in the order given.
    ///
    /// ```no_run
    /// use dripconf::{Argv, Config, EnvVar, Filename};
    ///
    /// let mut config = Config::new();
    /// config
    ///     .merge_from(&[
    ///         &Argv::new(1),
    ///         &EnvVar::new("MYAPP_CONF"),
    ///         &Filename::new("settings.ini"),
    ///     ])
    ///     .unwrap();
    /// ```
    pub fn merge_from(&mut self, sources: &[&dyn ConfigSource]) -> Result<()> {
        for source in sources {
            if !source.is_usable() {
                debug!(source = %source.describe(), "Skipping unusable configuration source");
                continue;
            }
            let Some(path) = source.filename() else {
                continue;
            };
            info!(source = %source.describe(), path = %path.display(), "Loading configuration");
            return self.merge(path);
        }

        Err(Error::NoUsableSource {
            tried: sources.len(),
        })
    }

    /// Append a trigger; triggers run in registration order.
    pub fn register_trigger(&mut self, trigger: impl Trigger + 'static) {
        debug!(trigger = trigger.name(), "Registering trigger");
        self.triggers.push(Box::new(trigger));
    }

    pub fn trigger_names(&self) -> Vec<&str> {
        self.triggers.iter().map(|t| t.name()).collect()
    }

    /// Run every trigger with validation. See [`configure_with`](Self::configure_with).
    pub fn configure(&mut self) -> Result<()> {
        self.configure_with(true)
    }

    /// Run every registered trigger in order.
    ///
    /// For each trigger: when `validate` is set its `clean` result is
    /// merged back into the tree, then its `configure` step sees the
    /// updated tree. The first failure stops the run; triggers that
    /// already ran are not undone.
    pub fn configure_with(&mut self, validate: bool) -> Result<()> {
        for trigger in &self.triggers {
            if validate {
                let cleaned = trigger.clean(&self.root)?;
                debug!(trigger = trigger.name(), keys = cleaned.len(), "Trigger cleaned configuration");
                self.root.merge_dict(cleaned);
            }
            trigger.configure(&self.root)?;
            debug!(trigger = trigger.name(), "Trigger configured");
        }
        info!(triggers = self.triggers.len(), "Configuration complete");
        Ok(())
    }

    /// Deserialize the node at `name` into `T`.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        match self.root.get(name) {
            Some(value) => value.extract(),
            None => Err(Error::validation(
                name,
                vec![FieldFailure::new(name, "section not present")],
            )),
        }
    }
}

fn has_suffix(path: &Path, format: Format) -> bool {
    Format::from_path(path) == Some(format)
}

impl Deref for Config {
    type Target = ConfigNode;

    fn deref(&self) -> &ConfigNode {
        &self.root
    }
}

impl DerefMut for Config {
    fn deref_mut(&mut self) -> &mut ConfigNode {
        &mut self.root
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("root", &self.root)
            .field("triggers", &self.trigger_names())
            .finish()
    }
}

impl From<ConfigNode> for Config {
    fn from(root: ConfigNode) -> Self {
        Self {
            root,
            triggers: Vec::new(),
        }
    }
}
