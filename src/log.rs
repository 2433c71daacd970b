//! Commit history traversal.
//!
//! History is linear, so the walk simply follows `parent` links from the
//! starting commit back to the root.
//!
//! ```no_run
//! use minigit::{log::LogOptions, Repository};
//!
//! let repo = Repository::open("path/to/repo").unwrap();
//! for entry in repo.log_with_options(None, LogOptions::new().max_count(10)).unwrap() {
//!     let (oid, commit) = entry.unwrap();
//!     println!("{} {}", oid.short(), commit.summary());
//! }
//! ```

use std::collections::HashSet;

use tracing::warn;

use crate::error::Result;
use crate::objects::{Commit, ObjectStore, Oid};

/// Options for limiting the walk.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    max_count: Option<usize>,
}

impl LogOptions {
    /// Creates options that walk the whole history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after `n` commits.
    pub fn max_count(mut self, n: usize) -> Self {
        self.max_count = Some(n);
        self
    }
}

/// A lazy iterator over `(hash, commit)` pairs, newest first.
///
/// The walk ends at the root commit, at a hash that was already visited, or
/// right after yielding a read error.
#[derive(Debug)]
pub struct LogIterator {
    store: ObjectStore,
    next: Option<Oid>,
    visited: HashSet<Oid>,
    options: LogOptions,
    count: usize,
}

impl LogIterator {
    /// Creates an iterator starting at `start`; `None` yields nothing.
    pub fn new(store: ObjectStore, start: Option<Oid>) -> Self {
        Self::with_options(store, start, LogOptions::default())
    }

    /// Creates an iterator with limits.
    pub fn with_options(store: ObjectStore, start: Option<Oid>, options: LogOptions) -> Self {
        LogIterator {
            store,
            next: start,
            visited: HashSet::new(),
            options,
            count: 0,
        }
    }
}

impl Iterator for LogIterator {
    type Item = Result<(Oid, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(max) = self.options.max_count {
            if self.count >= max {
                return None;
            }
        }

        let oid = self.next.take()?;
        if !self.visited.insert(oid) {
            warn!(oid = %oid.short(), "history loops back on itself, stopping");
            return None;
        }

        match self.store.read_commit(&oid) {
            Ok(commit) => {
                self.next = commit.parent().copied();
                self.count += 1;
                Some(Ok((oid, commit)))
            }
            // next stays None, so the walk ends here
            Err(e) => Some(Err(e)),
        }
    }
}
