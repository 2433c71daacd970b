//! Working tree status.
//!
//! Status compares three path sets: the head commit's tracked paths, the
//! staged paths, and the files present in the working tree. File contents are
//! not inspected, so edits to tracked files are not reported.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;
use crate::index::Index;
use crate::infra::list_working_tree;
use crate::reconcile::Snapshot;

/// The state of a file as reported by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Present in the staging index.
    Staged,
    /// Present in the working tree but neither staged nor tracked.
    Untracked,
}

/// The result of a status query. Both lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    staged: Vec<String>,
    untracked: Vec<String>,
}

impl Status {
    /// Returns the staged paths.
    pub fn staged(&self) -> &[String] {
        &self.staged
    }

    /// Returns the untracked paths.
    pub fn untracked(&self) -> &[String] {
        &self.untracked
    }

    /// Returns true if nothing is staged and nothing is untracked.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.untracked.is_empty()
    }

    /// Iterates over every reported path with its status, staged first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FileStatus)> {
        self.staged
            .iter()
            .map(|p| (p.as_str(), FileStatus::Staged))
            .chain(self.untracked.iter().map(|p| (p.as_str(), FileStatus::Untracked)))
    }
}

/// Computes the status of the working tree rooted at `work_dir`.
///
/// `meta_dir_name` is skipped during the walk. `head` holds the paths
/// tracked by the current commit.
pub fn compute_status(
    work_dir: &Path,
    meta_dir_name: &str,
    head: &Snapshot,
    index: &Index,
) -> Result<Status> {
    let working_files = list_working_tree(work_dir, meta_dir_name)?;
    Ok(classify(working_files, head, index))
}

fn classify(working_files: Vec<String>, head: &Snapshot, index: &Index) -> Status {
    let staged: Vec<String> = index.paths().map(str::to_string).collect();

    let untracked: BTreeSet<String> = working_files
        .into_iter()
        .filter(|path| !head.is_tracked(path) && !index.contains(path))
        .collect();

    Status {
        staged,
        untracked: untracked.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Commit, Oid, Tree, TreeEntry};
    use std::fs;
    use tempfile::TempDir;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes([n; 20])
    }

    fn head_tracking(paths: &[&str]) -> Snapshot {
        let tree = Tree::new(paths.iter().map(|p| TreeEntry::file(*p, oid(1))).collect());
        let commit = Commit::with_tracked_files(oid(0), None, "t <t@localhost>", "m", paths);
        Snapshot::from_parts(&commit, &tree)
    }

    #[test]
    fn test_classify_partitions_paths() {
        let mut index = Index::new();
        index.insert("new.txt", oid(2));
        let head = head_tracking(&["old.txt"]);

        let working = vec![
            "new.txt".to_string(),
            "old.txt".to_string(),
            "stray.txt".to_string(),
        ];
        let status = classify(working, &head, &index);

        assert_eq!(status.staged(), ["new.txt".to_string()]);
        assert_eq!(status.untracked(), ["stray.txt".to_string()]);
        assert!(!status.is_clean());
    }

    #[test]
    fn test_staged_path_missing_from_disk_still_staged() {
        let mut index = Index::new();
        index.insert("gone.txt", oid(2));
        let status = classify(Vec::new(), &Snapshot::empty(), &index);
        assert_eq!(status.staged(), ["gone.txt".to_string()]);
        assert!(status.untracked().is_empty());
    }

    #[test]
    fn test_compute_status_skips_meta_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".minigit/objects")).unwrap();
        fs::write(temp.path().join(".minigit/HEAD"), "ref: refs/heads/master\n").unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/lib.rs"), "").unwrap();
        fs::write(temp.path().join("b.txt"), "").unwrap();

        let status =
            compute_status(temp.path(), ".minigit", &Snapshot::empty(), &Index::new()).unwrap();
        assert_eq!(
            status.untracked(),
            ["b.txt".to_string(), "src/lib.rs".to_string()]
        );
        assert!(status.staged().is_empty());
    }

    #[test]
    fn test_iter_orders_staged_first() {
        let mut index = Index::new();
        index.insert("z.txt", oid(2));
        let status = classify(vec!["a.txt".to_string()], &Snapshot::empty(), &index);
        let items: Vec<_> = status.iter().collect();
        assert_eq!(
            items,
            vec![("z.txt", FileStatus::Staged), ("a.txt", FileStatus::Untracked)]
        );
    }
}
