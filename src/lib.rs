//! # minigit
//!
//! A minimal content-addressable version-control store.
//!
//! Files are stored as zlib-compressed, SHA-1 addressed objects under
//! `.minigit/objects`. A text staging index collects files for the next
//! commit, and a single branch ref records the newest commit of a strictly
//! linear history.
//!
//! ## Quick Start
//!
//! ```no_run
//! use minigit::{Repository, Result};
//!
//! fn main() -> Result<()> {
//!     let repo = Repository::init("path/to/repo")?;
//!
//!     std::fs::write(repo.path().join("a.txt"), "hello")?;
//!     repo.add(&["a.txt"])?;
//!     repo.create_commit(Some("first"))?;
//!
//!     for entry in repo.log(None)? {
//!         let (oid, commit) = entry?;
//!         println!("{} {}", oid.short(), commit.summary());
//!     }
//!
//!     let status = repo.status()?;
//!     for path in status.untracked() {
//!         println!("untracked: {}", path);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and Result alias
//! - [`repository`] - Main `Repository` type
//! - [`objects`] - Object model (blob, tree, commit) and the object store
//! - [`index`] - Staging index
//! - [`refs`] - The branch ref and HEAD
//! - [`reconcile`] - Commit-time tracked-path reconciliation
//! - [`status`] - Working tree status
//! - [`log`] - History traversal
//! - [`config`] - Repository configuration
//! - [`identity`] - Commit author identities

pub mod config;
pub mod error;
pub mod identity;
pub mod index;
pub mod log;
pub mod objects;
pub mod reconcile;
pub mod refs;
pub mod repository;
pub mod status;

// Internal modules (not part of public API)
pub(crate) mod infra;

pub use config::Config;
pub use error::{Error, Result};
pub use identity::{ConfigIdentity, EnvIdentity, FixedIdentity, IdentityProvider};
pub use repository::{AddOutcome, Removal, Repository, META_DIR};

pub use objects::{Blob, Commit, FileMode, Object, ObjectStore, ObjectType, Oid, Tree, TreeEntry};

pub use refs::Head;

pub use status::{FileStatus, Status};

pub use index::Index;

pub use log::{LogIterator, LogOptions};
