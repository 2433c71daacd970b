//! Object model (blob, tree, commit) and the object store.

pub mod blob;
pub mod commit;
pub mod oid;
pub mod store;
pub mod tree;

pub use blob::Blob;
pub use commit::{Commit, FILES_MARKER};
pub use oid::Oid;
pub use store::{ObjectStore, ObjectType, RawObject};
pub use tree::{FileMode, Tree, TreeEntry};

use crate::error::Result;

/// Any stored object.
///
/// The set of variants is fixed by the frame format, so every site that
/// serializes or deserializes matches it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// A blob object containing file content.
    Blob(Blob),
    /// A tree object containing entries.
    Tree(Tree),
    /// A commit object.
    Commit(Commit),
}

impl Object {
    /// Returns the type of this object.
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Blob(_) => ObjectType::Blob,
            Object::Tree(_) => ObjectType::Tree,
            Object::Commit(_) => ObjectType::Commit,
        }
    }

    /// Serializes the payload (the frame header is added by the store).
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Object::Blob(blob) => blob.serialize(),
            Object::Tree(tree) => tree.serialize(),
            Object::Commit(commit) => commit.serialize(),
        }
    }

    /// Deserializes a payload of the given type.
    pub fn deserialize(kind: ObjectType, data: &[u8]) -> Result<Self> {
        Ok(match kind {
            ObjectType::Blob => Object::Blob(Blob::deserialize(data)),
            ObjectType::Tree => Object::Tree(Tree::deserialize(data)?),
            ObjectType::Commit => Object::Commit(Commit::deserialize(data)?),
        })
    }

    /// Consumes this Object and returns the inner Blob if this is a Blob object.
    pub fn into_blob(self) -> Option<Blob> {
        match self {
            Object::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    /// Consumes this Object and returns the inner Tree if this is a Tree object.
    pub fn into_tree(self) -> Option<Tree> {
        match self {
            Object::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Consumes this Object and returns the inner Commit if this is a Commit object.
    pub fn into_commit(self) -> Option<Commit> {
        match self {
            Object::Commit(commit) => Some(commit),
            _ => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Object::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Object::Commit(commit)
    }
}
