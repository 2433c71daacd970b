//! Filesystem utilities for file reading, writing, and directory traversal.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Reads the entire contents of a file as bytes.
///
/// A missing file is reported as `Error::PathNotFound`.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound(path.as_ref().to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Writes data to a file atomically.
///
/// The data goes to a hidden temporary sibling first and is then renamed
/// over the target, so readers see either the old or the new contents.
/// Missing parent directories are created.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = {
        let mut temp = path.to_path_buf();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "temp".to_string());
        temp.set_file_name(format!(".{}.tmp", file_name));
        temp
    };

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Lists the regular files below `start`, skipping any directory named
/// `skip_dir`.
///
/// Traversal is iterative, so deep trees do not grow the call stack.
/// Symlinks are not followed. Returned paths are rooted like `start` and
/// sorted.
pub fn list_files<P: AsRef<Path>>(start: P, skip_dir: &str) -> Result<Vec<PathBuf>> {
    let start = start.as_ref();
    let mut files = Vec::new();

    let walker = WalkDir::new(start)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == skip_dir));

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Lists every file in the working tree as a repository-relative,
/// `/`-separated path, excluding the metadata directory `skip_dir`.
pub fn list_working_tree<P: AsRef<Path>>(root: P, skip_dir: &str) -> Result<Vec<String>> {
    let root = root.as_ref();
    let mut files = Vec::new();

    for path in list_files(root, skip_dir)? {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| Error::PathOutsideWorkTree(path.clone()))?;
        files.push(to_slash(relative).ok_or(Error::InvalidUtf8)?);
    }

    files.sort();
    Ok(files)
}

/// Renders a relative path with `/` separators regardless of platform.
///
/// Returns `None` when a component is not valid UTF-8.
pub fn to_slash(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

/// Resolves `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
