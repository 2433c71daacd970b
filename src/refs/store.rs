//! Reading and advancing the branch ref.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Head;
use crate::error::{Error, Result};
use crate::infra::write_file_atomic;
use crate::objects::Oid;

/// The only branch a repository has.
pub const DEFAULT_BRANCH: &str = "master";

const HEAD_FILE: &str = "HEAD";
const HEADS_PREFIX: &str = "refs/heads/";

/// Access to `HEAD` and the branch ref file it names.
///
/// `HEAD` holds `ref: refs/heads/master`; the branch file holds the current
/// commit hash and a newline, and is absent until the first commit.
#[derive(Debug, Clone)]
pub struct RefStore {
    /// Path to the metadata directory.
    meta_dir: PathBuf,
}

impl RefStore {
    /// Creates a RefStore for the given metadata directory.
    pub fn new<P: AsRef<Path>>(meta_dir: P) -> Self {
        RefStore {
            meta_dir: meta_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates `refs/heads/` and points `HEAD` at the default branch.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.meta_dir.join("refs").join("heads"))?;
        write_file_atomic(
            self.meta_dir.join(HEAD_FILE),
            format!("ref: {}{}\n", HEADS_PREFIX, DEFAULT_BRANCH).as_bytes(),
        )
    }

    /// Returns the ref name HEAD points to, e.g. `refs/heads/master`.
    pub fn head_target(&self) -> Result<String> {
        let content = fs::read_to_string(self.meta_dir.join(HEAD_FILE)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotARepository(self.meta_dir.clone())
            } else {
                Error::Io(e)
            }
        })?;

        let target = content
            .trim()
            .strip_prefix("ref: ")
            .ok_or_else(|| Error::InvalidRef {
                name: HEAD_FILE.to_string(),
                reason: "expected \"ref: refs/heads/<branch>\"".to_string(),
            })?;

        if !target.starts_with(HEADS_PREFIX) || target.contains("..") {
            return Err(Error::InvalidRef {
                name: HEAD_FILE.to_string(),
                reason: format!("unsupported target {}", target),
            });
        }

        Ok(target.to_string())
    }

    /// Reads the current commit hash; `None` before the first commit.
    pub fn read_head(&self) -> Result<Option<Oid>> {
        let target = self.head_target()?;
        let path = self.meta_dir.join(&target);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        let hex = content.trim();
        if hex.is_empty() {
            return Ok(None);
        }

        Oid::from_hex(hex).map(Some).map_err(|_| Error::InvalidRef {
            name: target,
            reason: format!("not a commit hash: {:?}", hex),
        })
    }

    /// Returns the HEAD state.
    pub fn head(&self) -> Result<Head> {
        let target = self.head_target()?;
        let name = target.trim_start_matches(HEADS_PREFIX).to_string();
        Ok(match self.read_head()? {
            Some(oid) => Head::branch(name, oid),
            None => Head::unborn(name),
        })
    }

    /// Points the branch at `oid`, replacing the ref file atomically.
    pub fn update_head(&self, oid: &Oid) -> Result<()> {
        let target = self.head_target()?;
        write_file_atomic(self.meta_dir.join(&target), format!("{}\n", oid).as_bytes())?;
        debug!(reference = %target, oid = %oid.short(), "ref updated");
        Ok(())
    }
}
