//! Staging index.
//!
//! The index file (`.minigit/index`) is a text file with one
//! `<path> <hash>` line per staged file. It is rewritten as a whole on every
//! change and left empty (not removed) after a commit.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::infra::{read_file, write_file_atomic};
use crate::objects::Oid;

/// The staging area: repository-relative path to blob hash.
///
/// Each path maps to at most one hash. Entries iterate in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<String, Oid>,
}

impl Index {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the index file; a missing file is an empty index.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Index::new());
        }
        let data = read_file(path)?;
        let text = String::from_utf8(data).map_err(|_| Error::InvalidUtf8)?;
        Self::parse(&text)
    }

    /// Writes the whole index to `path`, replacing the previous file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_file_atomic(path, self.serialize().as_bytes())?;
        debug!(entries = self.len(), "index written");
        Ok(())
    }

    /// Parses index text.
    ///
    /// The hash is taken from the end of each line, so paths may contain
    /// spaces. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let invalid = |reason: &str| Error::InvalidIndex {
                line: number + 1,
                reason: reason.to_string(),
            };

            let (path, hash) = line
                .rsplit_once(' ')
                .ok_or_else(|| invalid("expected \"<path> <hash>\""))?;
            if path.is_empty() {
                return Err(invalid("empty path"));
            }
            let oid = Oid::from_hex(hash).map_err(|_| invalid("invalid hash"))?;

            entries.insert(path.to_string(), oid);
        }

        Ok(Index { entries })
    }

    /// Serializes the index, one `<path> <hash>` line per entry.
    pub fn serialize(&self) -> String {
        let mut text = String::new();
        for (path, oid) in &self.entries {
            text.push_str(path);
            text.push(' ');
            text.push_str(&oid.to_hex());
            text.push('\n');
        }
        text
    }

    /// Stages `path` at `oid`, returning the hash it replaced.
    pub fn insert(&mut self, path: impl Into<String>, oid: Oid) -> Option<Oid> {
        self.entries.insert(path.into(), oid)
    }

    /// Unstages `path`, returning the hash it was staged at.
    ///
    /// # Errors
    ///
    /// `Error::PathNotTracked` if the path is not staged.
    pub fn remove(&mut self, path: &str) -> Result<Oid> {
        self.entries
            .remove(path)
            .ok_or_else(|| Error::PathNotTracked(path.to_string()))
    }

    /// Returns the staged hash for `path`.
    pub fn get(&self, path: &str) -> Option<&Oid> {
        self.entries.get(path)
    }

    /// Returns true if `path` is staged.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns the staged paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over `(path, hash)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Oid)> {
        self.entries.iter().map(|(path, oid)| (path.as_str(), oid))
    }

    /// Returns the number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const A: &str = "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0";
    const B: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    fn oid(hex: &str) -> Oid {
        Oid::from_hex(hex).unwrap()
    }

    #[test]
    fn test_parse_and_serialize() {
        let text = format!("b.txt {}\na.txt {}\n", B, A);
        let index = Index::parse(&text).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a.txt"), Some(&oid(A)));
        // serialized in path order
        assert_eq!(index.serialize(), format!("a.txt {}\nb.txt {}\n", A, B));
    }

    #[test]
    fn test_path_with_spaces() {
        let mut index = Index::new();
        index.insert("my notes/todo list.txt", oid(A));
        let parsed = Index::parse(&index.serialize()).unwrap();
        assert_eq!(parsed.get("my notes/todo list.txt"), Some(&oid(A)));
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(matches!(
            Index::parse("no-hash-here\n"),
            Err(Error::InvalidIndex { line: 1, .. })
        ));
        let text = format!("a.txt {}\nb.txt nothex\n", A);
        assert!(matches!(
            Index::parse(&text),
            Err(Error::InvalidIndex { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = format!("\na.txt {}\n\n", A);
        assert_eq!(Index::parse(&text).unwrap().len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut index = Index::new();
        assert_eq!(index.insert("a.txt", oid(A)), None);
        assert_eq!(index.insert("a.txt", oid(B)), Some(oid(A)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut index = Index::new();
        index.insert("a.txt", oid(A));

        assert_eq!(index.remove("a.txt").unwrap(), oid(A));
        assert!(matches!(
            index.remove("a.txt"),
            Err(Error::PathNotTracked(path)) if path == "a.txt"
        ));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let index = Index::load(temp.path().join("index")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_save_empty_leaves_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        let mut index = Index::new();
        index.insert("a.txt", oid(A));
        index.save(&path).unwrap();
        assert_eq!(Index::load(&path).unwrap(), index);

        index.clear();
        index.save(&path).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }
}
