//! Integration tests for working tree status.

use std::fs;
use std::path::Path;

use minigit::{FileStatus, FixedIdentity, Repository};
use tempfile::TempDir;

fn init_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path())
        .unwrap()
        .with_identity(FixedIdentity::new("Test <test@localhost>"));
    (temp, repo)
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

#[test]
fn test_empty_repository_is_clean() {
    let (_temp, repo) = init_repo();
    assert!(repo.status().unwrap().is_clean());
}

#[test]
fn test_new_file_is_untracked() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello");

    let status = repo.status().unwrap();
    assert!(status.staged().is_empty());
    assert_eq!(status.untracked(), ["a.txt".to_string()]);
}

#[test]
fn test_added_file_is_staged() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello");
    repo.add(&["a.txt"]).unwrap();

    let status = repo.status().unwrap();
    assert_eq!(status.staged(), ["a.txt".to_string()]);
    assert!(status.untracked().is_empty());
}

#[test]
fn test_add_then_rm_is_untracked_again() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello");
    repo.add(&["a.txt"]).unwrap();
    repo.rm(&["a.txt"]).unwrap();

    let status = repo.status().unwrap();
    assert!(status.staged().is_empty());
    assert_eq!(status.untracked(), ["a.txt".to_string()]);
}

#[test]
fn test_committed_file_is_neither_staged_nor_untracked() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello");
    repo.add(&["a.txt"]).unwrap();
    repo.create_commit(Some("first")).unwrap();

    assert!(repo.status().unwrap().is_clean());

    // edits are not detected
    write(temp.path(), "a.txt", "changed");
    assert!(repo.status().unwrap().is_clean());
}

#[test]
fn test_status_lists_are_sorted_and_nested() {
    let (temp, repo) = init_repo();
    write(temp.path(), "z.txt", "z");
    write(temp.path(), "a/b/c.txt", "c");
    write(temp.path(), "m.txt", "m");
    write(temp.path(), "staged2.txt", "2");
    write(temp.path(), "staged1.txt", "1");
    repo.add(&["staged2.txt", "staged1.txt"]).unwrap();

    let status = repo.status().unwrap();
    assert_eq!(
        status.staged(),
        ["staged1.txt".to_string(), "staged2.txt".to_string()]
    );
    assert_eq!(
        status.untracked(),
        [
            "a/b/c.txt".to_string(),
            "m.txt".to_string(),
            "z.txt".to_string()
        ]
    );

    let kinds: Vec<FileStatus> = status.iter().map(|(_, s)| s).collect();
    assert_eq!(
        kinds,
        vec![
            FileStatus::Staged,
            FileStatus::Staged,
            FileStatus::Untracked,
            FileStatus::Untracked,
            FileStatus::Untracked
        ]
    );
}

#[test]
fn test_status_from_reopened_repository() {
    let (temp, repo) = init_repo();
    write(temp.path(), "a.txt", "hello");
    repo.add(&["a.txt"]).unwrap();
    drop(repo);

    let reopened = Repository::discover(temp.path()).unwrap();
    assert_eq!(reopened.status().unwrap().staged(), ["a.txt".to_string()]);
}
