//! SHA-1 content hashing of object frames.

use sha1::{Digest, Sha1};

/// SHA-1 hash size in bytes.
pub const SHA1_SIZE: usize = 20;

/// Builds the frame that is hashed and stored: `{type} {size}\0{content}`.
pub fn frame(object_type: &str, content: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", object_type, content.len());
    let mut framed = Vec::with_capacity(header.len() + content.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(content);
    framed
}

/// Computes the SHA-1 hash of an object frame.
///
/// Usage: `let hash = hash_object("blob", b"hello");`
///
/// The empty blob hash is `e69de29bb2d1d6434b8b29ae775ad8c2e48c5391`.
pub fn hash_object(object_type: &str, content: &[u8]) -> [u8; SHA1_SIZE] {
    let mut hasher = Sha1::new();
    hasher.update(format!("{} {}\0", object_type, content.len()).as_bytes());
    hasher.update(content);
    hasher.finalize().into()
}
