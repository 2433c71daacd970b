//! Repository configuration (`.minigit/config`).
//!
//! The file uses an INI-like format:
//!
//! ```text
//! [user]
//!     name = Jane Doe
//!     email = jane@example.com
//! ```
//!
//! Section and key names are case-insensitive. Keys under a header with a
//! quoted subsection (`[remote "origin"]`) are skipped.

mod parser;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::infra::read_file;

/// File name of the configuration inside the metadata directory.
pub const CONFIG_FILE: &str = "config";

/// A parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// section -> key -> value; section and key names are lowercased.
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `<meta_dir>/config`; a missing file is an empty configuration.
    pub fn load<P: AsRef<Path>>(meta_dir: P) -> Result<Self> {
        let path = meta_dir.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::new());
        }
        Self::from_file(path)
    }

    /// Parses configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = read_file(path.as_ref())?;
        let text = String::from_utf8(content).map_err(|_| Error::InvalidUtf8)?;
        Ok(Self::parse(&text))
    }

    /// Parses configuration text. Lines that are not headers or
    /// `key = value` pairs are ignored.
    pub fn parse(content: &str) -> Self {
        parser::parse(content)
    }

    /// Looks up `key` in `section` (e.g. `get("user", "name")`).
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries
            .get(&section.to_lowercase())
            .and_then(|keys| keys.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    /// Sets a value, replacing any earlier one. Later lines win.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.entries
            .entry(section.to_lowercase())
            .or_default()
            .insert(key.to_lowercase(), value.to_string());
    }

    /// Returns true if no values are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
