//! [`ConfigDir`] builder for on-disk configuration fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding configuration files
///
/// # Example
///
/// ```rust
/// use dripconf_test_utils::ConfigDir;
///
/// let dir = ConfigDir::new();
/// let ini = dir.write_ini("app.ini", "[main]\nname = demo\n");
/// assert!(ini.exists());
/// assert!(!dir.path("missing.json").exists());
/// ```
pub struct ConfigDir {
    temp_dir: TempDir,
}

impl Default for ConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `name` inside the directory, whether or not it exists.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write `contents` to `name`, creating parent directories.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
        path
    }

    pub fn write_ini(&self, name: &str, contents: &str) -> PathBuf {
        self.write(&with_suffix(name, "ini"), contents)
    }

    pub fn write_json(&self, name: &str, contents: &str) -> PathBuf {
        self.write(&with_suffix(name, "json"), contents)
    }

    pub fn write_yaml(&self, name: &str, contents: &str) -> PathBuf {
        self.write(&with_suffix(name, "yaml"), contents)
    }

    /// Delete `name` from the directory.
    ///
    /// # Panics
    /// Panics if the file does not exist.
    pub fn remove(&self, name: &str) {
        let path = self.path(name);
        fs::remove_file(&path)
            .unwrap_or_else(|e| panic!("Could not remove {}: {e}", path.display()));
    }
}

fn with_suffix(name: &str, suffix: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.{suffix}")
    }
}
