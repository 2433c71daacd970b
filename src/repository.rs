//! Repository operations.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{ConfigIdentity, IdentityProvider};
use crate::index::Index;
use crate::infra::fs::{list_files, normalize, to_slash};
use crate::infra::{hash_object, read_file};
use crate::log::{LogIterator, LogOptions};
use crate::objects::oid::OID_HEX_LEN;
use crate::objects::{Blob, Commit, Object, ObjectStore, ObjectType, Oid, Tree};
use crate::reconcile::{plan_commit, Snapshot};
use crate::refs::{Head, RefStore};
use crate::status::{compute_status, Status};

/// Name of the metadata directory at the root of the work tree.
pub const META_DIR: &str = ".minigit";

const INDEX_FILE: &str = "index";
const OBJECTS_DIR: &str = "objects";
const REFS_DIR: &str = "refs";
const HEAD_FILE: &str = "HEAD";

/// Shortest abbreviated hash accepted by lookups.
pub const MIN_SHORT_OID_LEN: usize = 4;

/// The result of adding one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The file's content was stored and recorded in the index.
    Staged {
        /// Repository-relative path.
        path: String,
        /// Hash of the stored blob.
        oid: Oid,
    },
    /// The path is tracked and its content matches the recorded blob.
    Unchanged {
        /// Repository-relative path.
        path: String,
    },
}

impl AddOutcome {
    /// Returns the repository-relative path.
    pub fn path(&self) -> &str {
        match self {
            AddOutcome::Staged { path, .. } | AddOutcome::Unchanged { path } => path,
        }
    }
}

/// The result of removing one path from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The path was staged and has been dropped from the index.
    Unstaged(String),
    /// The path was not staged; nothing changed.
    NotTracked(String),
}

/// A minigit repository.
///
/// Holds the work tree root, the `.minigit` directory and the identity used
/// for new commits. All operations go through this type; nothing reads the
/// process working directory or environment behind its back except the
/// default identity provider.
#[derive(Debug)]
pub struct Repository {
    /// The root directory of the working tree.
    work_dir: PathBuf,
    /// The path to the `.minigit` directory.
    meta_dir: PathBuf,
    store: ObjectStore,
    refs: RefStore,
    identity: Box<dyn IdentityProvider>,
}

impl Repository {
    /// Creates an empty repository at `path`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// - `Error::AlreadyARepository` if `path` already holds a repository.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use minigit::Repository;
    ///
    /// let repo = Repository::init("path/to/repo").unwrap();
    /// assert!(repo.head().unwrap().is_unborn());
    /// ```
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        let work_dir = path.canonicalize()?;
        let meta_dir = work_dir.join(META_DIR);

        if meta_dir.join(HEAD_FILE).exists() {
            return Err(Error::AlreadyARepository(work_dir));
        }

        fs::create_dir_all(meta_dir.join(OBJECTS_DIR))?;
        RefStore::new(&meta_dir).init()?;
        info!(path = %meta_dir.display(), "initialized empty repository");

        Self::from_parts(work_dir, meta_dir)
    }

    /// Checks the layout of a metadata directory.
    ///
    /// A valid `.minigit` directory contains a `HEAD` file and the `objects/`
    /// and `refs/` directories.
    fn validate_meta_dir(meta_dir: &Path) -> Result<()> {
        let valid = meta_dir.is_dir()
            && meta_dir.join(HEAD_FILE).is_file()
            && meta_dir.join(OBJECTS_DIR).is_dir()
            && meta_dir.join(REFS_DIR).is_dir();

        if valid {
            Ok(())
        } else {
            Err(Error::NotARepository(meta_dir.to_path_buf()))
        }
    }

    /// Opens an existing repository.
    ///
    /// The path can point to either the work tree root or the `.minigit`
    /// directory itself.
    ///
    /// # Errors
    ///
    /// - `Error::NotARepository` if no valid repository is found at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        let (work_dir, meta_dir) = if abs_path.ends_with(META_DIR) {
            let work_dir = abs_path
                .parent()
                .ok_or_else(|| Error::NotARepository(path.to_path_buf()))?
                .to_path_buf();
            (work_dir, abs_path)
        } else {
            let meta_dir = abs_path.join(META_DIR);
            (abs_path, meta_dir)
        };

        Self::validate_meta_dir(&meta_dir)?;
        Self::from_parts(work_dir, meta_dir)
    }

    /// Opens the nearest repository at or above `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use minigit::Repository;
    ///
    /// let repo = Repository::discover("path/to/repo/src/lib").unwrap();
    /// ```
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut current = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        loop {
            let meta_dir = current.join(META_DIR);
            if Self::validate_meta_dir(&meta_dir).is_ok() {
                return Self::from_parts(current, meta_dir);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(Error::NotARepository(path.to_path_buf())),
            }
        }
    }

    fn from_parts(work_dir: PathBuf, meta_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&meta_dir)?;
        Ok(Repository {
            store: ObjectStore::new(meta_dir.join(OBJECTS_DIR)),
            refs: RefStore::new(&meta_dir),
            identity: Box::new(ConfigIdentity::new(&config)),
            work_dir,
            meta_dir,
        })
    }

    /// Replaces the identity used to author new commits.
    pub fn with_identity<I: IdentityProvider + 'static>(mut self, identity: I) -> Self {
        self.identity = Box::new(identity);
        self
    }

    /// Returns the path to the repository root (working directory).
    pub fn path(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the path to the `.minigit` directory.
    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    /// Returns the object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    fn index_path(&self) -> PathBuf {
        self.meta_dir.join(INDEX_FILE)
    }

    /// Reads the staging index.
    pub fn index(&self) -> Result<Index> {
        Index::load(self.index_path())
    }

    /// Resolves a full or abbreviated hash to a stored object ID.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidOid` if the string is too short, is not hex, or is
    ///   ambiguous.
    /// - `Error::UnknownRevision` if no stored object matches a prefix.
    pub fn resolve_oid(&self, hex: &str) -> Result<Oid> {
        if hex.len() == OID_HEX_LEN {
            return Oid::from_hex(hex);
        }

        if hex.len() < MIN_SHORT_OID_LEN
            || hex.len() > OID_HEX_LEN
            || !hex.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Error::InvalidOid(hex.to_string()));
        }

        let mut matches = self.store.find_by_prefix(hex)?;
        match matches.len() {
            0 => Err(Error::UnknownRevision(hex.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(Error::InvalidOid(format!(
                "ambiguous short hash: {} ({} matches)",
                hex, n
            ))),
        }
    }

    /// Reads any object by full or abbreviated hash.
    pub fn object(&self, hex: &str) -> Result<Object> {
        let oid = self.resolve_oid(hex)?;
        self.store.read(&oid)
    }

    /// Reads a blob by hash.
    pub fn blob(&self, hex: &str) -> Result<Blob> {
        let oid = self.resolve_oid(hex)?;
        self.store.read_blob(&oid)
    }

    /// Reads a tree by hash.
    pub fn tree(&self, hex: &str) -> Result<Tree> {
        let oid = self.resolve_oid(hex)?;
        self.store.read_tree(&oid)
    }

    /// Reads a commit by hash.
    pub fn commit(&self, hex: &str) -> Result<Commit> {
        let oid = self.resolve_oid(hex)?;
        self.store.read_commit(&oid)
    }

    /// Stores a file's content as a blob and returns its hash.
    ///
    /// Relative paths are taken from the work tree root. The file does not
    /// need to live inside the work tree.
    pub fn hash_object<P: AsRef<Path>>(&self, path: P) -> Result<Oid> {
        let path = path.as_ref();
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        };
        let content = read_file(&full_path)?;
        self.store.write(ObjectType::Blob, &content)
    }

    /// Returns the HEAD state.
    pub fn head(&self) -> Result<Head> {
        self.refs.head()
    }

    /// Loads what the current head commit recorded.
    fn head_snapshot(&self) -> Result<Snapshot> {
        self.snapshot(self.refs.read_head()?.as_ref())
    }

    fn snapshot(&self, commit: Option<&Oid>) -> Result<Snapshot> {
        match commit {
            Some(oid) => Snapshot::load(&self.store, &self.store.read_commit(oid)?),
            None => Ok(Snapshot::empty()),
        }
    }

    /// Maps a user-supplied path to its absolute form and its
    /// repository-relative, `/`-separated form.
    fn resolve_path(&self, path: &Path) -> Result<(PathBuf, String)> {
        let outside = || Error::PathOutsideWorkTree(path.to_path_buf());

        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        };
        let absolute = normalize(&joined);

        let relative = match absolute.strip_prefix(&self.work_dir) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => {
                // the caller may have spelled the root through a symlink
                let canonical = absolute.canonicalize().map_err(|_| outside())?;
                canonical
                    .strip_prefix(&self.work_dir)
                    .map_err(|_| outside())?
                    .to_path_buf()
            }
        };

        if let Some(Component::Normal(first)) = relative.components().next() {
            if first == META_DIR {
                return Err(outside());
            }
        }

        let relative = to_slash(&relative).ok_or_else(outside)?;
        Ok((absolute, relative))
    }

    /// Adds files to the staging index.
    ///
    /// Directories are walked for regular files, skipping `.minigit`. A file
    /// that is tracked and whose content matches its recorded blob is left
    /// alone; anything else is stored as a blob and staged.
    ///
    /// # Errors
    ///
    /// - `Error::PathNotFound` if a path does not exist.
    /// - `Error::PathOutsideWorkTree` if a path is outside the work tree or
    ///   inside `.minigit`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use minigit::Repository;
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    /// repo.add(&["src/main.rs"]).unwrap();
    /// ```
    pub fn add<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<AddOutcome>> {
        let mut index = self.index()?;
        let head = self.head_snapshot()?;
        let mut outcomes = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let (absolute, relative) = self.resolve_path(path)?;

            if absolute.is_dir() {
                for file in list_files(&absolute, META_DIR)? {
                    let sub = file
                        .strip_prefix(&absolute)
                        .ok()
                        .and_then(to_slash)
                        .ok_or_else(|| Error::PathOutsideWorkTree(file.clone()))?;
                    let file_relative = if relative.is_empty() {
                        sub
                    } else {
                        format!("{}/{}", relative, sub)
                    };
                    outcomes.push(self.stage_file(&mut index, &head, &file, file_relative)?);
                }
            } else if absolute.is_file() {
                outcomes.push(self.stage_file(&mut index, &head, &absolute, relative)?);
            } else {
                return Err(Error::PathNotFound(path.to_path_buf()));
            }
        }

        if outcomes
            .iter()
            .any(|o| matches!(o, AddOutcome::Staged { .. }))
        {
            index.save(self.index_path())?;
        }

        Ok(outcomes)
    }

    fn stage_file(
        &self,
        index: &mut Index,
        head: &Snapshot,
        file: &Path,
        path: String,
    ) -> Result<AddOutcome> {
        let content = read_file(file)?;
        let oid = Oid::from_bytes(hash_object(ObjectType::Blob.as_str(), &content));

        let recorded = if index.contains(&path) {
            index.get(&path)
        } else if head.is_tracked(&path) {
            head.resolve(&path)
        } else {
            None
        };

        if recorded == Some(&oid) {
            debug!(path = %path, "unchanged, not staged");
            return Ok(AddOutcome::Unchanged { path });
        }

        self.store.write(ObjectType::Blob, &content)?;
        index.insert(path.clone(), oid);
        Ok(AddOutcome::Staged { path, oid })
    }

    /// Removes paths from the staging index.
    ///
    /// Paths that are not staged are reported as `Removal::NotTracked` and
    /// the rest are still processed. Working tree files are never touched.
    pub fn rm<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Removal>> {
        let mut index = self.index()?;
        let mut removals = Vec::with_capacity(paths.len());

        for path in paths {
            let (_, relative) = self.resolve_path(path.as_ref())?;
            match index.remove(&relative) {
                Ok(_) => removals.push(Removal::Unstaged(relative)),
                Err(Error::PathNotTracked(relative)) => {
                    debug!(path = %relative, "not staged, nothing to remove");
                    removals.push(Removal::NotTracked(relative));
                }
                Err(e) => return Err(e),
            }
        }

        if removals.iter().any(|r| matches!(r, Removal::Unstaged(_))) {
            index.save(self.index_path())?;
        }

        Ok(removals)
    }

    /// Records a new commit from the staging index and the head commit.
    ///
    /// Paths tracked by the head commit but not restaged keep the blob the
    /// head recorded. The message gains a `[files]` trailer listing every
    /// tracked path. Without a message, `Commit at <unix seconds>` is used.
    ///
    /// # Errors
    ///
    /// - `Error::NothingToCommit` if no tracked path resolves to a blob. The
    ///   store, the ref and the index are left untouched.
    pub fn create_commit(&self, message: Option<&str>) -> Result<Oid> {
        let index = self.index()?;
        let parent = self.refs.read_head()?;
        let head = self.snapshot(parent.as_ref())?;

        let plan = plan_commit(&index, &head)?;

        let tree_oid = self.store.write_object(&Object::Tree(plan.tree()))?;

        let message = match message {
            Some(message) => message.to_string(),
            None => default_message(),
        };
        let commit = Commit::with_tracked_files(
            tree_oid,
            parent,
            self.identity.identity(),
            &message,
            &plan.tracked,
        );
        let commit_oid = self.store.write_object(&Object::Commit(commit))?;

        self.refs.update_head(&commit_oid)?;
        Index::new().save(self.index_path())?;

        info!(
            oid = %commit_oid.short(),
            tree = %tree_oid.short(),
            files = plan.entries.len(),
            "committed"
        );
        Ok(commit_oid)
    }

    /// Reports staged and untracked files.
    pub fn status(&self) -> Result<Status> {
        let head = self.head_snapshot()?;
        let index = self.index()?;
        compute_status(&self.work_dir, META_DIR, &head, &index)
    }

    /// Walks history from `start`, or from the head when `start` is `None`.
    pub fn log(&self, start: Option<Oid>) -> Result<LogIterator> {
        self.log_with_options(start, LogOptions::default())
    }

    /// Walks history with limits.
    pub fn log_with_options(&self, start: Option<Oid>, options: LogOptions) -> Result<LogIterator> {
        let start = match start {
            Some(oid) => Some(oid),
            None => self.refs.read_head()?,
        };
        Ok(LogIterator::with_options(self.store.clone(), start, options))
    }

    /// Lists every stored object with its type, or the error that kept it
    /// from being read and deserialized.
    pub fn ls_objects(&self) -> Result<Vec<(Oid, Result<ObjectType>)>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|oid| {
                let kind = self.store.read(&oid).map(|object| object.kind());
                (oid, kind)
            })
            .collect())
    }
}

fn default_message() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("Commit at {}", secs)
}
