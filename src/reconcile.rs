//! Commit-time reconciliation of the staging index with the parent commit.
//!
//! The set of tracked paths is the union of the parent commit's `[files]`
//! trailer and the staged paths. Each tracked path resolves to its staged
//! blob, or to the blob the parent's tree recorded for it.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::objects::{Commit, ObjectStore, Oid, Tree, TreeEntry};

/// What a commit recorded: its tracked paths and their blob hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    tracked: BTreeSet<String>,
    files: BTreeMap<String, Oid>,
}

impl Snapshot {
    /// The snapshot before the first commit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from a commit and its stored tree.
    pub fn load(store: &ObjectStore, commit: &Commit) -> Result<Self> {
        let tree = store.read_tree(commit.tree())?;
        Ok(Self::from_parts(commit, &tree))
    }

    /// Builds a snapshot from a commit and an already loaded tree.
    pub fn from_parts(commit: &Commit, tree: &Tree) -> Self {
        Snapshot {
            tracked: commit.tracked_paths().into_iter().collect(),
            files: tree
                .iter()
                .map(|entry| (entry.name().to_string(), *entry.oid()))
                .collect(),
        }
    }

    /// Returns true if `path` is listed in the commit's trailer.
    pub fn is_tracked(&self, path: &str) -> bool {
        self.tracked.contains(path)
    }

    /// Returns the blob recorded for `path` in the commit's tree.
    pub fn resolve(&self, path: &str) -> Option<&Oid> {
        self.files.get(path)
    }

    /// Returns the tracked paths in sorted order.
    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.tracked.iter().map(String::as_str)
    }
}

/// The outcome of reconciling the index against a parent snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    /// Tree entries for every resolved path, sorted by path.
    pub entries: Vec<TreeEntry>,
    /// Every tracked path, resolved or not, sorted.
    pub tracked: Vec<String>,
}

impl CommitPlan {
    /// Builds the tree object for this plan.
    pub fn tree(&self) -> Tree {
        Tree::new(self.entries.clone())
    }
}

/// Computes the tree entries and trailer paths for the next commit.
///
/// Paths that resolve to neither a staged nor a committed blob are left out
/// of the tree but stay in the trailer. Fails with `NothingToCommit` when
/// nothing resolves.
pub fn plan_commit(index: &Index, parent: &Snapshot) -> Result<CommitPlan> {
    let tracked: BTreeSet<&str> = parent.tracked().chain(index.paths()).collect();

    let mut entries = Vec::with_capacity(tracked.len());
    for path in &tracked {
        match index.get(path).or_else(|| parent.resolve(path)) {
            Some(oid) => entries.push(TreeEntry::file(*path, *oid)),
            None => warn!(path = %path, "tracked path has no recorded blob, leaving it out"),
        }
    }

    if entries.is_empty() {
        return Err(Error::NothingToCommit);
    }

    Ok(CommitPlan {
        entries,
        tracked: tracked.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes([n; 20])
    }

    fn parent_with(files: &[(&str, u8)], extra_tracked: &[&str]) -> Snapshot {
        let tree = Tree::new(files.iter().map(|(p, n)| TreeEntry::file(*p, oid(*n))).collect());
        let mut paths: Vec<&str> = files.iter().map(|(p, _)| *p).collect();
        paths.extend_from_slice(extra_tracked);
        let commit = Commit::with_tracked_files(oid(0), None, "t <t@localhost>", "m", paths);
        Snapshot::from_parts(&commit, &tree)
    }

    #[test]
    fn test_empty_index_and_no_parent_is_nothing_to_commit() {
        let result = plan_commit(&Index::new(), &Snapshot::empty());
        assert!(matches!(result, Err(Error::NothingToCommit)));
    }

    #[test]
    fn test_entries_sorted_regardless_of_staging_order() {
        let mut index = Index::new();
        index.insert("zeta.txt", oid(3));
        index.insert("alpha.txt", oid(1));
        index.insert("mid/file.txt", oid(2));

        let plan = plan_commit(&index, &Snapshot::empty()).unwrap();
        let names: Vec<&str> = plan.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alpha.txt", "mid/file.txt", "zeta.txt"]);
        assert_eq!(plan.tracked, vec!["alpha.txt", "mid/file.txt", "zeta.txt"]);
    }

    #[test]
    fn test_unstaged_committed_paths_carry_forward() {
        let parent = parent_with(&[("a.txt", 1), ("b.txt", 2)], &[]);
        let mut index = Index::new();
        index.insert("b.txt", oid(9));

        let plan = plan_commit(&index, &parent).unwrap();
        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0], TreeEntry::file("a.txt", oid(1)));
        assert_eq!(plan.entries[1], TreeEntry::file("b.txt", oid(9)));
    }

    #[test]
    fn test_empty_index_with_parent_reuses_parent_tree() {
        let parent = parent_with(&[("a.txt", 1)], &[]);
        let plan = plan_commit(&Index::new(), &parent).unwrap();
        assert_eq!(plan.entries, vec![TreeEntry::file("a.txt", oid(1))]);
    }

    #[test]
    fn test_unresolved_paths_stay_in_trailer_only() {
        let parent = parent_with(&[("a.txt", 1)], &["ghost.txt"]);
        let plan = plan_commit(&Index::new(), &parent).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.tracked, vec!["a.txt", "ghost.txt"]);
    }

    #[test]
    fn test_only_unresolved_paths_is_nothing_to_commit() {
        let parent = parent_with(&[], &["ghost.txt"]);
        let result = plan_commit(&Index::new(), &parent);
        assert!(matches!(result, Err(Error::NothingToCommit)));
    }

    #[test]
    fn test_snapshot_queries() {
        let parent = parent_with(&[("a.txt", 1)], &[]);
        assert!(parent.is_tracked("a.txt"));
        assert!(!parent.is_tracked("b.txt"));
        assert_eq!(parent.resolve("a.txt"), Some(&oid(1)));
        assert_eq!(parent.resolve("b.txt"), None);
    }
}
