//! Error types for minigit.

use std::path::PathBuf;

use crate::objects::Oid;

/// The main error type for minigit operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The specified path is not a minigit repository.
    #[error("not a minigit repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// A repository already exists at the specified path.
    #[error("repository already exists: {}", .0.display())]
    AlreadyARepository(PathBuf),

    /// The requested object has no entry in the object store.
    #[error("object not found: {0}")]
    ObjectNotFound(Oid),

    /// The decompressed bytes are not a valid `<type> <len>\0<payload>` frame.
    #[error("corrupt object {oid}: {reason}")]
    CorruptFrame {
        /// The object ID.
        oid: Oid,
        /// What was wrong with the frame.
        reason: String,
    },

    /// The frame's type tag is not blob, tree or commit.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// A tree payload does not follow the entry layout.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// A commit payload is missing headers or is not UTF-8.
    #[error("malformed commit: {0}")]
    MalformedCommit(String),

    /// Type mismatch when expecting a specific object type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: &'static str,
        /// The actual type.
        actual: &'static str,
    },

    /// The provided string is not a valid object ID.
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    /// No stored object matches an abbreviated hash.
    #[error("no object matches {0}")]
    UnknownRevision(String),

    /// Zlib decompression failed.
    #[error("zlib decompression failed")]
    DecompressionFailed,

    /// Invalid UTF-8 sequence encountered.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,

    /// The index file could not be parsed.
    #[error("invalid index at line {line}: {reason}")]
    InvalidIndex {
        /// 1-based line number.
        line: usize,
        /// The reason for invalidity.
        reason: String,
    },

    /// A ref file holds something other than a commit hash.
    #[error("invalid reference {name}: {reason}")]
    InvalidRef {
        /// The reference name.
        name: String,
        /// The reason for invalidity.
        reason: String,
    },

    /// The specified path was not found.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The path lies outside the work tree or inside the metadata directory.
    #[error("path is outside the work tree: {}", .0.display())]
    PathOutsideWorkTree(PathBuf),

    /// No tracked file resolved to a blob, so there is nothing to commit.
    #[error("nothing to commit")]
    NothingToCommit,

    /// The path is not present in the staging index.
    #[error("{0} is not tracked")]
    PathNotTracked(String),
}

impl Error {
    /// Returns true for conditions that are reported but leave persisted
    /// state untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NothingToCommit | Error::PathNotTracked(_))
    }
}

/// Result type alias for minigit operations.
pub type Result<T> = std::result::Result<T, Error>;
