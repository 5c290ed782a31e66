//! Sources that point at configuration files
//!
//! A source only knows *where* configuration might live. It never reads
//! file contents; [`Config::merge_from`](crate::Config::merge_from) asks each
//! source in turn whether it is usable and merges the first one that is.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The location of some configuration and whether it exists
pub trait ConfigSource {
    /// The file this source points at, if it resolved to one.
    fn filename(&self) -> Option<&Path>;

    /// True when the source resolved to a path that currently exists.
    ///
    /// Checked on every call, never cached.
    fn is_usable(&self) -> bool {
        self.filename().is_some_and(Path::exists)
    }

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// A literal filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filename {
    path: PathBuf,
}

impl Filename {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for Filename {
    fn filename(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A filename read from an environment variable when the source is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    name: String,
    path: Option<PathBuf>,
}

impl EnvVar {
    /// Resolve `name` from the process environment.
    ///
    /// Unset or empty variables resolve to no filename.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let path = std::env::var_os(&name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ConfigSource for EnvVar {
    fn filename(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.name)
    }
}

/// A filename taken from the command line by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argv {
    index: usize,
    path: Option<PathBuf>,
}

impl Argv {
    /// Resolve the 0-based `index` from the process arguments.
    pub fn new(index: usize) -> Self {
        Self::from_args(std::env::args_os(), index)
    }

    /// Resolve `index` against an explicit argument vector.
    pub fn from_args<I, S>(args: I, index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let path = args
            .into_iter()
            .nth(index)
            .map(|arg| PathBuf::from(arg.into()));
        Self { index, path }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl ConfigSource for Argv {
    fn filename(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn describe(&self) -> String {
        format!("argument {}", self.index)
    }
}
