//! Blob objects: raw file contents.

use crate::error::{Error, Result};

/// A blob object holding a file's bytes verbatim.
///
/// Blobs carry no name or mode; those live in tree entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content: Vec<u8>,
}

impl Blob {
    /// Creates a blob from file contents.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Blob {
            content: content.into(),
        }
    }

    /// Serializes the blob payload, which is the content itself.
    pub fn serialize(&self) -> Vec<u8> {
        self.content.clone()
    }

    /// Deserializes a blob payload. Any byte sequence is a valid blob.
    pub fn deserialize(data: &[u8]) -> Self {
        Blob::new(data)
    }

    /// Returns the raw content of the blob.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consumes the blob and returns its content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Returns the content as a UTF-8 string, if valid.
    pub fn content_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|_| Error::InvalidUtf8)
    }

    /// Returns the size of the blob content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_binary() {
        let data: Vec<u8> = (0u8..=255).collect();
        let blob = Blob::new(data.clone());
        assert_eq!(blob.serialize(), data);
        assert_eq!(Blob::deserialize(&blob.serialize()), blob);
    }

    #[test]
    fn test_content_str() {
        let blob = Blob::new(&b"hello"[..]);
        assert_eq!(blob.content_str().unwrap(), "hello");
        assert_eq!(blob.size(), 5);

        let blob = Blob::new(vec![0xFF, 0xFE]);
        assert!(matches!(blob.content_str(), Err(Error::InvalidUtf8)));
    }

    #[test]
    fn test_empty_blob() {
        let blob = Blob::deserialize(b"");
        assert_eq!(blob.size(), 0);
        assert!(blob.serialize().is_empty());
    }
}
