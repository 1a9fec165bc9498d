//! Git repository port for version-control queries.

use std::path::PathBuf;

use thiserror::Error;

/// Id of the empty tree in SHA-1 repositories.
pub const EMPTY_TREE_SHA1: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
/// Id of the empty tree in SHA-256 repositories.
pub const EMPTY_TREE_SHA256: &str =
    "6ef19b41225c5369f1c104d45d8d85efa9b057b53b14b4b9b939dd74decc5321";

/// Hash algorithm a repository uses for object ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectFormat {
    /// The legacy 160-bit SHA-1 format.
    #[default]
    Sha1,
    /// The 256-bit SHA-256 format.
    Sha256,
}

impl ObjectFormat {
    /// The well-known id of the empty tree under this hash algorithm.
    #[must_use]
    pub fn empty_tree_id(self) -> &'static str {
        match self {
            Self::Sha1 => EMPTY_TREE_SHA1,
            Self::Sha256 => EMPTY_TREE_SHA256,
        }
    }
}

/// Returns `true` if `id` is the empty tree under any hash algorithm.
#[must_use]
pub fn is_empty_tree(id: &str) -> bool {
    id == EMPTY_TREE_SHA1 || id == EMPTY_TREE_SHA256
}

/// Where a blob should be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobLocation {
    /// The tree of the commit with this id.
    Commit(String),
    /// The staging area (stage 0 of the index).
    Index,
}

/// Errors reported by a [`GitRepo`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GitError {
    /// The path does not hold a usable repository.
    #[error("{} is not a valid git repository: {message}", .path.display())]
    OpenRepository {
        /// Path that was opened.
        path: PathBuf,
        /// Backend message.
        message: String,
    },
    /// The stem of an ancestry expression resolved, but history ran out
    /// before the requested number of steps.
    #[error("not enough parent commits to reach '{expr}'")]
    NotEnoughAncestors {
        /// The expression that was being resolved.
        expr: String,
    },
    /// The expression does not name a commit.
    #[error("revision not found: '{expr}'")]
    RevisionNotFound {
        /// The expression that was being resolved.
        expr: String,
    },
    /// No file exists at the requested path.
    #[error("path '{path}' does not exist")]
    PathNotFound {
        /// The missing path.
        path: String,
    },
    /// Any other backend failure.
    #[error("git error: {0}")]
    Backend(String),
}

/// Provides read-only access to a git repository.
///
/// Abstracting git access keeps the revision logic testable against
/// in-memory fakes as well as real repositories.
pub trait GitRepo: Send {
    /// Resolves a revision expression (`HEAD~2`, a branch, a short id) to a
    /// full commit id.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotEnoughAncestors`] when the expression walks past
    /// a root commit, and [`GitError::RevisionNotFound`] when it names nothing.
    fn resolve_commit(&self, expr: &str) -> Result<String, GitError>;

    /// Returns the hash algorithm the repository is configured with.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository configuration cannot be read.
    fn object_format(&self) -> Result<ObjectFormat, GitError>;

    /// Returns the unified diff between two tree-ish ids.
    ///
    /// `base` may be the empty-tree id even when that object is not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be loaded.
    fn diff(&self, base: &str, target: &str) -> Result<String, GitError>;

    /// Returns the diff of the index against the last commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    fn diff_staged(&self) -> Result<String, GitError>;

    /// Returns the diff of the working tree against the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index or working tree cannot be read.
    fn diff_unstaged(&self) -> Result<String, GitError>;

    /// Lists every file in the tree of the given commit, recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit or its tree cannot be loaded.
    fn list_tree_files(&self, commit: &str) -> Result<Vec<String>, GitError>;

    /// Lists the files currently tracked in the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    fn list_index_files(&self) -> Result<Vec<String>, GitError>;

    /// Reads a file's content at the given location.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::PathNotFound`] if no such file exists there.
    fn read_blob(&self, location: &BlobLocation, path: &str) -> Result<String, GitError>;

    /// Returns messages of commits reachable from `target` but not from
    /// `base`, newest first. With no `base`, the full history of `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the history walk fails.
    fn log_messages(&self, base: Option<&str>, target: &str) -> Result<Vec<String>, GitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_id_matches_format() {
        assert_eq!(ObjectFormat::Sha1.empty_tree_id().len(), 40);
        assert_eq!(ObjectFormat::Sha256.empty_tree_id().len(), 64);
        assert_eq!(ObjectFormat::default(), ObjectFormat::Sha1);
    }

    #[test]
    fn recognizes_both_empty_trees() {
        assert!(is_empty_tree(EMPTY_TREE_SHA1));
        assert!(is_empty_tree(EMPTY_TREE_SHA256));
        assert!(!is_empty_tree("4b825dc"));
    }
}
