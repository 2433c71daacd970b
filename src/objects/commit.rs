//! Commit objects and the `[files]` trailer.

use super::oid::Oid;
use crate::error::{Error, Result};

/// The marker line that opens the tracked-files trailer of a commit message.
pub const FILES_MARKER: &str = "[files]";

/// A commit object.
///
/// Commits form a singly-linked list through `parent`; a commit without a
/// parent is the root of the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree: Oid,
    parent: Option<Oid>,
    author: String,
    message: String,
}

impl Commit {
    /// Creates a commit. The author is a free-text identity such as
    /// `Jane <jane@localhost>` and must fit on one line.
    pub fn new(
        tree: Oid,
        parent: Option<Oid>,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Commit {
            tree,
            parent,
            author: author.into(),
            message: message.into(),
        }
    }

    /// Creates a commit whose message ends with a `[files]` trailer listing
    /// `paths` one per line.
    pub fn with_tracked_files<I, S>(
        tree: Oid,
        parent: Option<Oid>,
        author: impl Into<String>,
        message: &str,
        paths: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut full = String::from(message);
        full.push_str("\n\n");
        full.push_str(FILES_MARKER);
        for path in paths {
            full.push('\n');
            full.push_str(path.as_ref());
        }
        Self::new(tree, parent, author, full)
    }

    /// Serializes the commit payload.
    ///
    /// ```text
    /// tree <hash>
    /// parent <hash>      (omitted for the root commit)
    /// author <identity>
    /// committer <identity>
    ///
    /// <message>
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut lines = vec![format!("tree {}", self.tree)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent));
        }
        lines.push(format!("author {}", self.author));
        lines.push(format!("committer {}", self.author));
        lines.push(String::new());
        lines.push(self.message.clone());
        lines.join("\n").into_bytes()
    }

    /// Deserializes a commit payload.
    ///
    /// The headers end at the first blank line; everything after it is the
    /// message, byte for byte. A missing `parent` header marks a root commit.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|_| Error::MalformedCommit("payload is not UTF-8".to_string()))?;

        let (headers, message) = match text.find("\n\n") {
            Some(split) => (&text[..split], &text[split + 2..]),
            None => (text.trim_end_matches('\n'), ""),
        };

        let mut tree = None;
        let mut parent = None;
        let mut author = None;

        for line in headers.lines() {
            if let Some(value) = line.strip_prefix("tree ") {
                tree = Some(header_oid("tree", value)?);
            } else if let Some(value) = line.strip_prefix("parent ") {
                parent = Some(header_oid("parent", value)?);
            } else if let Some(value) = line.strip_prefix("author ") {
                author = Some(value.to_string());
            }
            // committer mirrors author; other headers are ignored
        }

        let tree = tree.ok_or_else(|| Error::MalformedCommit("missing tree".to_string()))?;
        let author = author.ok_or_else(|| Error::MalformedCommit("missing author".to_string()))?;

        Ok(Commit {
            tree,
            parent,
            author,
            message: message.to_string(),
        })
    }

    /// Returns the root tree ID.
    pub fn tree(&self) -> &Oid {
        &self.tree
    }

    /// Returns the parent commit ID, if any.
    pub fn parent(&self) -> Option<&Oid> {
        self.parent.as_ref()
    }

    /// Returns the author identity.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the full commit message, trailer included.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the message without the `[files]` trailer.
    pub fn body(&self) -> &str {
        match self.trailer_start() {
            Some(start) => self.message[..start].trim_end_matches('\n'),
            None => &self.message,
        }
    }

    /// Returns the first line of the message.
    pub fn summary(&self) -> &str {
        self.body().lines().next().unwrap_or("")
    }

    /// Returns true if this is the root commit.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the paths listed in the `[files]` trailer, in trailer order.
    ///
    /// Paths are returned verbatim, surrounding spaces included. Commits
    /// without a trailer track nothing.
    pub fn tracked_paths(&self) -> Vec<String> {
        let Some(start) = self.trailer_start() else {
            return Vec::new();
        };
        self.message[start..]
            .split('\n')
            .skip(1)
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Byte offset of the trailer marker.
    ///
    /// The marker is the last `[files]` line that follows an empty line.
    /// Path lines are never empty, so a tracked file named `[files]` is not
    /// mistaken for the marker.
    fn trailer_start(&self) -> Option<usize> {
        let mut offset = 0;
        let mut found = None;
        let mut after_blank = false;
        for raw in self.message.split('\n') {
            let line = raw.trim_end_matches('\r');
            if after_blank && line == FILES_MARKER {
                found = Some(offset);
            }
            after_blank = line.is_empty();
            offset += raw.len() + 1;
        }
        found
    }
}

fn header_oid(name: &str, value: &str) -> Result<Oid> {
    Oid::from_hex(value)
        .map_err(|_| Error::MalformedCommit(format!("invalid {} hash {:?}", name, value)))
}
