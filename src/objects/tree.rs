//! Tree objects: ordered `(mode, name, hash)` listings.

use super::oid::{Oid, OID_BYTES};
use crate::error::{Error, Result};

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Regular file: 100644
    Regular,
    /// Subdirectory (tree): 040000
    Directory,
}

impl FileMode {
    /// Parses a file mode from its octal string representation.
    ///
    /// `40000` (the form git writes) is accepted as a directory too.
    pub fn from_octal(s: &str) -> Option<Self> {
        match s {
            "100644" => Some(FileMode::Regular),
            "040000" | "40000" => Some(FileMode::Directory),
            _ => None,
        }
    }

    /// Returns the octal string representation of the mode.
    pub fn as_octal(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Directory => "040000",
        }
    }

    /// Returns the object type this mode points at.
    pub fn object_kind(&self) -> &'static str {
        match self {
            FileMode::Regular => "blob",
            FileMode::Directory => "tree",
        }
    }
}

/// An entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    oid: Oid,
}

impl TreeEntry {
    /// Creates a tree entry.
    pub fn new(mode: FileMode, name: impl Into<String>, oid: Oid) -> Self {
        TreeEntry {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// Creates a regular-file entry.
    pub fn file(name: impl Into<String>, oid: Oid) -> Self {
        Self::new(FileMode::Regular, name, oid)
    }

    /// Returns the file mode of the entry.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Returns the name of the entry.
    ///
    /// Trees written by this crate are flat, so a name may contain `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the object ID of the entry.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }
}

/// A tree object.
///
/// The format does not require any entry order; serialization keeps the
/// order entries were given in. Use [`Tree::sorted`] for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Creates a tree from entries in the given order.
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    /// Creates a tree with entries sorted by name.
    pub fn sorted(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Tree { entries }
    }

    /// Serializes the tree payload: per entry `<mode> <name>\0` followed by
    /// the 20 raw hash bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut content = Vec::new();
        for entry in &self.entries {
            content.extend_from_slice(entry.mode.as_octal().as_bytes());
            content.push(b' ');
            content.extend_from_slice(entry.name.as_bytes());
            content.push(0);
            content.extend_from_slice(entry.oid.as_bytes());
        }
        content
    }

    /// Deserializes a tree payload.
    ///
    /// Fails with `Error::MalformedTree` unless every entry is exactly
    /// `<mode> <name>\0` plus 20 hash bytes.
    pub fn deserialize(content: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let null_pos = content[pos..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| malformed(pos, "missing NUL after entry header"))?;

            let header = std::str::from_utf8(&content[pos..pos + null_pos])
                .map_err(|_| malformed(pos, "entry header is not UTF-8"))?;

            let (mode_str, name) = header
                .split_once(' ')
                .ok_or_else(|| malformed(pos, "missing space between mode and name"))?;

            let mode = FileMode::from_octal(mode_str)
                .ok_or_else(|| malformed(pos, &format!("unknown file mode {:?}", mode_str)))?;

            if name.is_empty() {
                return Err(malformed(pos, "empty entry name"));
            }

            pos += null_pos + 1;

            let oid = content
                .get(pos..pos + OID_BYTES)
                .and_then(Oid::from_slice)
                .ok_or_else(|| malformed(pos, "truncated hash"))?;

            pos += OID_BYTES;

            entries.push(TreeEntry {
                mode,
                name: name.to_string(),
                oid,
            });
        }

        Ok(Tree { entries })
    }

    /// Returns a slice of all entries in the tree.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }
}

fn malformed(offset: usize, reason: &str) -> Error {
    Error::MalformedTree(format!("{} at byte {}", reason, offset))
}
