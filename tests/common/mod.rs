//! Shared fixture: a throwaway repository with three commits.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Commit, Oid, Repository, Signature};
use tempfile::TempDir;

pub const SAMPLE_FILE: &str = "sample_file";
pub const README: &str = "README.md";
pub const README_TEXT: &str = "This is the README file";

/// A repository in a temporary directory, removed on drop.
pub struct TestRepo {
    pub repo: Repository,
    dir: TempDir,
}

impl TestRepo {
    /// Three commits on `sample_file`, the first also adding the README.
    ///
    /// `diff.mnemonicPrefix` is enabled so working-area diffs use
    /// `c/`, `i/` and `w/` prefixes.
    pub fn three_commits() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.config().unwrap().set_bool("diff.mnemonicPrefix", true).unwrap();
        let test_repo = Self { repo, dir };

        test_repo.write(SAMPLE_FILE, "this is from the 1st commit\n");
        test_repo.write(README, README_TEXT);
        test_repo.commit(&[SAMPLE_FILE, README], "commit #1");

        test_repo.write(
            SAMPLE_FILE,
            "this is from the 1st commit\nthis is from the 2nd commit\n",
        );
        test_repo.commit(&[SAMPLE_FILE], "commit #2");

        test_repo.write(
            SAMPLE_FILE,
            "this is from the 1st commit\n\
             this is from the 2nd commit, with edits from the 3rd commit\n",
        );
        test_repo.commit(&[SAMPLE_FILE], "commit #3");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) {
        let path = self.file(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn append(&self, name: &str, line: &str) {
        let mut content = std::fs::read_to_string(self.file(name)).unwrap();
        content.push_str(line);
        content.push('\n');
        self.write(name, &content);
    }

    /// Adds `names` to the index without committing.
    pub fn stage(&self, names: &[&str]) {
        let mut index = self.repo.index().unwrap();
        for name in names {
            index.add_path(Path::new(name)).unwrap();
        }
        index.write().unwrap();
    }

    /// Removes `name` from the index and the working tree.
    pub fn remove(&self, name: &str) {
        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(name)).unwrap();
        index.write().unwrap();
        std::fs::remove_file(self.file(name)).unwrap();
    }

    /// Stages `names` and commits the whole index.
    pub fn commit(&self, names: &[&str], message: &str) -> Oid {
        self.stage(names);
        self.commit_index(message)
    }

    pub fn commit_index(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&Commit<'_>> = parent.iter().collect();
        self.repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).unwrap()
    }
}
