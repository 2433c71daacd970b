//! Loose object store: one zlib-compressed frame per file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::oid::{Oid, OID_HEX_LEN};
use super::{Blob, Commit, Object, Tree};
use crate::error::{Error, Result};
use crate::infra::{compress, decompress, frame, hash_object, read_file, write_file_atomic};

/// The type tag of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// A blob (file content).
    Blob,
    /// A tree (directory listing).
    Tree,
    /// A commit.
    Commit,
}

impl ObjectType {
    /// Returns the tag as written in object frames.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Parses a frame tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectType::Blob),
            "tree" => Some(ObjectType::Tree),
            "commit" => Some(ObjectType::Commit),
            _ => None,
        }
    }
}

/// A decoded frame: the type tag and the payload it announced.
#[derive(Debug, Clone)]
pub struct RawObject {
    /// The type of the object.
    pub object_type: ObjectType,
    /// The payload, without the frame header.
    pub content: Vec<u8>,
}

/// A content-addressed store of loose objects.
///
/// An object with hash `h` lives at `objects/h[..2]/h[2..]`. Writes are
/// skipped when that path already exists, so stored bytes never change.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// Path to the objects directory (e.g., `.minigit/objects`).
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Creates a store rooted at the given objects directory.
    pub fn new<P: AsRef<Path>>(objects_dir: P) -> Self {
        ObjectStore {
            objects_dir: objects_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Converts an Oid to the path of its loose object file.
    ///
    /// For example, `da39a3ee5e6b4b0d3255bfef95601890afd80709` becomes
    /// `objects/da/39a3ee5e6b4b0d3255bfef95601890afd80709`.
    pub fn oid_to_path(&self, oid: &Oid) -> PathBuf {
        let hex = oid.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }

    /// Checks if an object exists in the store.
    pub fn exists(&self, oid: &Oid) -> bool {
        self.oid_to_path(oid).exists()
    }

    /// Writes a payload under the given type and returns its hash.
    ///
    /// The frame `<type> <len>\0<payload>` is hashed, compressed and written
    /// atomically. Writing an object that is already present is a no-op.
    pub fn write(&self, object_type: ObjectType, content: &[u8]) -> Result<Oid> {
        let oid = Oid::from_bytes(hash_object(object_type.as_str(), content));

        let path = self.oid_to_path(&oid);
        if path.exists() {
            debug!(oid = %oid.short(), kind = object_type.as_str(), "object already stored");
            return Ok(oid);
        }

        let compressed = compress(&frame(object_type.as_str(), content));
        write_file_atomic(&path, &compressed)?;
        debug!(
            oid = %oid.short(),
            kind = object_type.as_str(),
            size = content.len(),
            "object written"
        );

        Ok(oid)
    }

    /// Serializes and writes a typed object.
    pub fn write_object(&self, object: &Object) -> Result<Oid> {
        self.write(object.kind(), &object.serialize())
    }

    /// Reads an object's frame without deserializing the payload.
    pub fn read_raw(&self, oid: &Oid) -> Result<RawObject> {
        let compressed = read_file(self.oid_to_path(oid)).map_err(|e| match e {
            Error::PathNotFound(_) => Error::ObjectNotFound(*oid),
            other => other,
        })?;
        let decompressed = decompress(&compressed)?;
        parse_frame(&decompressed, oid)
    }

    /// Reads and deserializes an object.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if nothing is stored under `oid`.
    /// - `Error::DecompressionFailed` if the file is not a zlib stream.
    /// - `Error::CorruptFrame` if the header cannot be parsed.
    /// - `Error::UnknownObjectType` for tags other than blob, tree, commit.
    /// - `Error::MalformedTree` / `Error::MalformedCommit` for bad payloads.
    pub fn read(&self, oid: &Oid) -> Result<Object> {
        let raw = self.read_raw(oid)?;
        Object::deserialize(raw.object_type, &raw.content)
    }

    /// Reads a blob, failing with `TypeMismatch` for other types.
    pub fn read_blob(&self, oid: &Oid) -> Result<Blob> {
        let object = self.read(oid)?;
        let actual = object.kind().as_str();
        object.into_blob().ok_or(Error::TypeMismatch {
            expected: "blob",
            actual,
        })
    }

    /// Reads a tree, failing with `TypeMismatch` for other types.
    pub fn read_tree(&self, oid: &Oid) -> Result<Tree> {
        let object = self.read(oid)?;
        let actual = object.kind().as_str();
        object.into_tree().ok_or(Error::TypeMismatch {
            expected: "tree",
            actual,
        })
    }

    /// Reads a commit, failing with `TypeMismatch` for other types.
    pub fn read_commit(&self, oid: &Oid) -> Result<Commit> {
        let object = self.read(oid)?;
        let actual = object.kind().as_str();
        object.into_commit().ok_or(Error::TypeMismatch {
            expected: "commit",
            actual,
        })
    }

    /// Lists every stored object ID in ascending order.
    ///
    /// Files that do not follow the `xx/yyyy...` naming are ignored.
    pub fn list(&self) -> Result<Vec<Oid>> {
        let mut oids = Vec::new();
        if !self.objects_dir.exists() {
            return Ok(oids);
        }

        for dir in fs::read_dir(&self.objects_dir)? {
            let dir = dir?;
            let dir_name = dir.file_name();
            let dir_name = dir_name.to_string_lossy();
            if dir_name.len() != 2 || !dir.file_type()?.is_dir() {
                continue;
            }

            for file in fs::read_dir(dir.path())? {
                let file = file?;
                let file_name = file.file_name();
                let full_hex = format!("{}{}", dir_name, file_name.to_string_lossy());
                if full_hex.len() != OID_HEX_LEN {
                    continue;
                }
                if let Ok(oid) = Oid::from_hex(&full_hex) {
                    oids.push(oid);
                }
            }
        }

        oids.sort();
        Ok(oids)
    }

    /// Returns every stored ID whose hex form starts with `prefix`.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Oid>> {
        let prefix = prefix.to_ascii_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|oid| oid.to_hex().starts_with(&prefix))
            .collect())
    }
}

/// Splits a decompressed frame into its type and payload.
fn parse_frame(data: &[u8], oid: &Oid) -> Result<RawObject> {
    let corrupt = |reason: String| Error::CorruptFrame { oid: *oid, reason };

    let null_pos = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| corrupt("missing NUL after header".to_string()))?;

    let header = std::str::from_utf8(&data[..null_pos])
        .map_err(|_| corrupt("header is not UTF-8".to_string()))?;

    let (type_str, size_str) = header
        .split_once(' ')
        .ok_or_else(|| corrupt(format!("header {:?} has no length", header)))?;

    let size: usize = size_str
        .parse()
        .map_err(|_| corrupt(format!("invalid length {:?}", size_str)))?;

    let object_type =
        ObjectType::parse(type_str).ok_or_else(|| Error::UnknownObjectType(type_str.to_string()))?;

    let content = &data[null_pos + 1..];
    if content.len() != size {
        return Err(corrupt(format!(
            "header says {} bytes but payload is {}",
            size,
            content.len()
        )));
    }

    Ok(RawObject {
        object_type,
        content: content.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::TreeEntry;
    use tempfile::TempDir;

    fn store() -> (TempDir, ObjectStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ObjectStore::new(temp_dir.path().join("objects"));
        (temp_dir, store)
    }

    /// Stores arbitrary bytes under `oid` as if they were a compressed frame.
    fn plant(store: &ObjectStore, oid: &Oid, frame_bytes: &[u8]) {
        let path = store.oid_to_path(oid);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, compress(frame_bytes)).unwrap();
    }

    #[test]
    fn test_oid_to_path_splits_hex() {
        let store = ObjectStore::new("/repo/.minigit/objects");
        let oid = Oid::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(
            store.oid_to_path(&oid),
            PathBuf::from("/repo/.minigit/objects/da/39a3ee5e6b4b0d3255bfef95601890afd80709")
        );
    }

    #[test]
    fn test_write_read_blob() {
        let (_temp, store) = store();
        let oid = store.write(ObjectType::Blob, b"hello").unwrap();

        // `printf hello | git hash-object --stdin`
        assert_eq!(oid.to_hex(), "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
        assert_eq!(store.read_blob(&oid).unwrap().content(), b"hello");
    }

    #[test]
    fn test_stored_bytes_are_compressed_frame() {
        let (_temp, store) = store();
        let oid = store.write(ObjectType::Blob, b"hello").unwrap();

        let on_disk = fs::read(store.oid_to_path(&oid)).unwrap();
        assert_eq!(decompress(&on_disk).unwrap(), b"blob 5\0hello");
    }

    #[test]
    fn test_duplicate_write_is_noop() {
        let (_temp, store) = store();
        let first = store.write(ObjectType::Blob, b"same").unwrap();
        let path = store.oid_to_path(&first);
        let before = fs::read(&path).unwrap();
        let modified_before = fs::metadata(&path).unwrap().modified().unwrap();

        let second = store.write(ObjectType::Blob, b"same").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified_before);
    }

    #[test]
    fn test_write_object_roundtrip_tree() {
        let (_temp, store) = store();
        let blob = store.write(ObjectType::Blob, b"x").unwrap();
        let tree = Tree::sorted(vec![TreeEntry::file("x.txt", blob)]);

        let oid = store.write_object(&Object::Tree(tree.clone())).unwrap();
        assert_eq!(store.read_tree(&oid).unwrap(), tree);
    }

    #[test]
    fn test_read_not_found() {
        let (_temp, store) = store();
        let oid = Oid::from_hex("0000000000000000000000000000000000000000").unwrap();
        assert!(matches!(store.read(&oid), Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn test_read_not_zlib() {
        let (_temp, store) = store();
        let oid = Oid::from_hex("1111111111111111111111111111111111111111").unwrap();
        let path = store.oid_to_path(&oid);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"plain text").unwrap();

        assert!(matches!(store.read(&oid), Err(Error::DecompressionFailed)));
    }

    #[test]
    fn test_read_corrupt_frames() {
        let (_temp, store) = store();
        let oid = Oid::from_hex("2222222222222222222222222222222222222222").unwrap();

        for bad in [&b"blob 5hello"[..], b"blob\0hello", b"blob five\0hello", b"blob 9\0hello"] {
            plant(&store, &oid, bad);
            assert!(
                matches!(store.read(&oid), Err(Error::CorruptFrame { .. })),
                "frame {:?} should be corrupt",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn test_read_unknown_type() {
        let (_temp, store) = store();
        let oid = Oid::from_hex("3333333333333333333333333333333333333333").unwrap();
        plant(&store, &oid, b"tag 3\0abc");

        match store.read(&oid) {
            Err(Error::UnknownObjectType(tag)) => assert_eq!(tag, "tag"),
            other => panic!("expected UnknownObjectType, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_read_mismatch() {
        let (_temp, store) = store();
        let oid = store.write(ObjectType::Blob, b"not a commit").unwrap();
        assert!(matches!(
            store.read_commit(&oid),
            Err(Error::TypeMismatch {
                expected: "commit",
                actual: "blob"
            })
        ));
    }

    #[test]
    fn test_list_objects_sorted() {
        let (_temp, store) = store();
        assert!(store.list().unwrap().is_empty());

        let mut written = vec![
            store.write(ObjectType::Blob, b"one").unwrap(),
            store.write(ObjectType::Blob, b"two").unwrap(),
            store.write(ObjectType::Blob, b"three").unwrap(),
        ];
        written.sort();

        assert_eq!(store.list().unwrap(), written);
    }

    #[test]
    fn test_find_by_prefix() {
        let (_temp, store) = store();
        let oid = store.write(ObjectType::Blob, b"hello").unwrap();
        store.write(ObjectType::Blob, b"other").unwrap();

        assert_eq!(store.find_by_prefix(&oid.to_hex()[..6]).unwrap(), vec![oid]);
        assert_eq!(
            store.find_by_prefix(&oid.to_hex()[..6].to_uppercase()).unwrap(),
            vec![oid]
        );
        assert_eq!(store.find_by_prefix("").unwrap().len(), 2);
    }
}
