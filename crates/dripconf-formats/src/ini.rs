//! INI-style sectioned `key = value` files
//!
//! The dialect follows the common INI conventions:
//!
//! - `[name]` starts a section; `[DEFAULT]` holds values every other
//!   section inherits unless it sets them itself. A comment may follow
//!   the closing bracket
//! - `key = value` and `key: value` are both accepted; keys are
//!   lower-cased, keys and values are trimmed
//! - lines starting with `#` or `;` are comments
//! - a line indented deeper than the key above it continues that value
//!   (joined with `\n`)
//! - every value is a string; typing is left to the consumer

use std::path::Path;

use crate::{Error, Format, Result, read_text};

/// Name of the section whose values every other section inherits
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A named section and its entries in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries defined directly in this section, without inherited defaults.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }
}

/// A parsed INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    defaults: Section,
    sections: Vec<Section>,
}

/// Section a line is added to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Defaults,
    Section(usize),
}

struct PendingValue {
    section: Target,
    entry: usize,
    indent: usize,
}

impl Sections {
    /// Parse INI text
    ///
    /// # Example
    ///
    /// ```
    /// use dripconf_formats::Sections;
    ///
    /// let sections = Sections::parse("[main]\nname = demo\n\n[db]\nport = 5432\n").unwrap();
    /// assert_eq!(sections.section("main").unwrap().get("name"), Some("demo"));
    /// assert_eq!(sections.items("db").unwrap(), vec![("port".to_string(), "5432".to_string())]);
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let mut parsed = Sections {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        };
        let mut current: Option<Target> = None;
        let mut pending: Option<PendingValue> = None;

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = line.len() - line.trim_start().len();

            if let Some(value) = &pending {
                if indent > value.indent {
                    let entry = parsed.entry_mut(value.section, value.entry);
                    entry.1.push('\n');
                    entry.1.push_str(trimmed);
                    continue;
                }
            }
            pending = None;

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = section_name(header)
                    .map_err(|message| Error::parse_at(Format::Ini, line_no, message))?;
                if name == DEFAULT_SECTION {
                    current = Some(Target::Defaults);
                } else if parsed.has_section(name) {
                    return Err(Error::parse_at(
                        Format::Ini,
                        line_no,
                        format!("section '{name}' already exists"),
                    ));
                } else {
                    parsed.sections.push(Section::new(name));
                    current = Some(Target::Section(parsed.sections.len() - 1));
                }
                continue;
            }

            let Some(section) = current else {
                return Err(Error::parse_at(
                    Format::Ini,
                    line_no,
                    "file contains no section headers",
                ));
            };

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(Error::parse_at(
                    Format::Ini,
                    line_no,
                    format!("expected 'key = value', found '{trimmed}'"),
                ));
            };

            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(Error::parse_at(Format::Ini, line_no, "empty key"));
            }

            let target = parsed.section_mut(section);
            if target.contains(&key) {
                return Err(Error::parse_at(
                    Format::Ini,
                    line_no,
                    format!("option '{key}' in section '{}' already exists", target.name),
                ));
            }
            target.entries.push((key, value));
            pending = Some(PendingValue {
                section,
                entry: target.entries.len() - 1,
                indent,
            });
        }

        Ok(parsed)
    }

    /// Read and parse an INI file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_text(path)?;
        Self::parse(&content)
    }

    fn section_mut(&mut self, target: Target) -> &mut Section {
        match target {
            Target::Defaults => &mut self.defaults,
            Target::Section(index) => &mut self.sections[index],
        }
    }

    fn entry_mut(&mut self, section: Target, entry: usize) -> &mut (String, String) {
        &mut self.section_mut(section).entries[entry]
    }

    /// Whether a named (non-DEFAULT) section exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name == name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Named sections in file order. The DEFAULT section is not included.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Effective entries of a section: its own entries first, then any
    /// inherited defaults it does not override.
    pub fn items(&self, name: &str) -> Option<Vec<(String, String)>> {
        let section = self.section(name)?;
        let mut items = section.entries.clone();
        for (key, value) in &self.defaults.entries {
            if !section.contains(key) {
                items.push((key.clone(), value.clone()));
            }
        }
        Some(items)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.defaults.entries.is_empty()
    }
}

/// Name inside `[...]`, given the header without its opening bracket.
/// Only a comment may follow the closing bracket.
fn section_name(header: &str) -> std::result::Result<&str, String> {
    let Some((name, trailer)) = header.split_once(']') else {
        return Err("unterminated section header".to_string());
    };
    let trailer = trailer.trim();
    if !(trailer.is_empty() || trailer.starts_with(';') || trailer.starts_with('#')) {
        return Err(format!("unexpected '{trailer}' after section header"));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err("empty section name".to_string());
    }
    Ok(name)
}
