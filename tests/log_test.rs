//! Integration tests for history traversal.

use std::fs;

use minigit::log::LogOptions;
use minigit::{Error, FixedIdentity, Oid, Repository, META_DIR};
use tempfile::TempDir;

fn repo_with_commits(n: usize) -> (TempDir, Repository, Vec<Oid>) {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path())
        .unwrap()
        .with_identity(FixedIdentity::new("Test <test@localhost>"));

    let mut oids = Vec::new();
    for i in 0..n {
        fs::write(temp.path().join("file.txt"), format!("version {}", i)).unwrap();
        repo.add(&["file.txt"]).unwrap();
        oids.push(repo.create_commit(Some(format!("commit {}", i).as_str())).unwrap());
    }
    (temp, repo, oids)
}

#[test]
fn test_log_empty_repository() {
    let (_temp, repo, _) = repo_with_commits(0);
    assert_eq!(repo.log(None).unwrap().count(), 0);
}

#[test]
fn test_chain_walks_back_exactly_n_commits() {
    let (_temp, repo, oids) = repo_with_commits(5);

    let walked: Vec<(Oid, String)> = repo
        .log(None)
        .unwrap()
        .map(|r| {
            let (oid, commit) = r.unwrap();
            (oid, commit.body().to_string())
        })
        .collect();

    assert_eq!(walked.len(), 5);
    for (i, (oid, body)) in walked.iter().enumerate() {
        let n = 4 - i;
        assert_eq!(*oid, oids[n]);
        assert_eq!(body, &format!("commit {}", n));
    }
}

#[test]
fn test_parents_link_commits() {
    let (_temp, repo, oids) = repo_with_commits(3);

    let commits: Vec<_> = repo.log(None).unwrap().map(|r| r.unwrap().1).collect();
    assert_eq!(commits[0].parent(), Some(&oids[1]));
    assert_eq!(commits[1].parent(), Some(&oids[0]));
    assert!(commits[2].is_root());
}

#[test]
fn test_log_from_specific_commit() {
    let (_temp, repo, oids) = repo_with_commits(4);

    let walked: Vec<Oid> = repo
        .log(Some(oids[1]))
        .unwrap()
        .map(|r| r.unwrap().0)
        .collect();
    assert_eq!(walked, vec![oids[1], oids[0]]);
}

#[test]
fn test_log_max_count() {
    let (_temp, repo, oids) = repo_with_commits(4);

    let walked: Vec<Oid> = repo
        .log_with_options(None, LogOptions::new().max_count(2))
        .unwrap()
        .map(|r| r.unwrap().0)
        .collect();
    assert_eq!(walked, vec![oids[3], oids[2]]);
}

#[test]
fn test_broken_link_yields_error_then_stops() {
    let (temp, repo, oids) = repo_with_commits(3);

    // drop the middle commit's object file
    let path = repo.store().oid_to_path(&oids[1]);
    fs::remove_file(&path).unwrap();
    assert!(temp.path().join(META_DIR).exists());

    let items: Vec<_> = repo.log(None).unwrap().collect();
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], Ok((oid, _)) if *oid == oids[2]));
    assert!(matches!(&items[1], Err(Error::ObjectNotFound(oid)) if *oid == oids[1]));
}

#[test]
fn test_trailer_lists_all_tracked_paths() {
    let (temp, repo, _) = repo_with_commits(1);
    fs::write(temp.path().join("second.txt"), "2").unwrap();
    repo.add(&["second.txt"]).unwrap();
    let oid = repo.create_commit(Some("add second")).unwrap();

    let commit = repo.commit(&oid.to_hex()).unwrap();
    assert_eq!(
        commit.message(),
        "add second\n\n[files]\nfile.txt\nsecond.txt"
    );
}
