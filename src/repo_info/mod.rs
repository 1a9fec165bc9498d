//! Repository state extraction: turns a revision expression into the diff,
//! file list, README and commit messages a commit-message prompt needs.
//!
//! All access goes through the [`GitRepo`] port and is read-only.

pub mod lookup;
pub mod mode;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::ports::git::{BlobLocation, GitError, GitRepo};

pub use lookup::{filter_test_paths, find_readme, first_success, is_test_path, README_CANDIDATES};
pub use mode::{RevisionMode, RevisionPair, CURRENT_CHECKOUT};

/// Repository state for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    /// Unified diff text.
    pub diff: String,
    /// Newline-joined tracked paths, test paths removed.
    pub file_list: String,
    /// README content at the described revision.
    pub readme_content: String,
    /// Commit messages in the described range, newest first.
    pub message: String,
}

impl RepoInfo {
    /// Builds a record with every field trimmed.
    #[must_use]
    pub fn new(diff: &str, file_list: &str, readme_content: &str, message: &str) -> Self {
        Self {
            diff: diff.trim().to_string(),
            file_list: file_list.trim().to_string(),
            readme_content: readme_content.trim().to_string(),
            message: message.trim().to_string(),
        }
    }
}

/// Errors from [`resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The expression does not name a revision.
    #[error("Invalid commit: {expr}")]
    RevisionNotFound {
        /// The offending expression.
        expr: String,
    },
    /// The backend failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Collects repository state for `expression`.
///
/// An empty expression describes staged changes, else unstaged changes,
/// else the last commit.
///
/// # Errors
///
/// Returns [`ResolveError::RevisionNotFound`] if the expression names no
/// revision. A missing README or an empty diff is not an error.
pub fn resolve(git: &dyn GitRepo, expression: &str) -> Result<RepoInfo, ResolveError> {
    let mut mode = RevisionMode::from_expression(expression);
    loop {
        debug!(?mode, "resolving repository state");
        mode = match mode {
            RevisionMode::ExplicitRange { base, target } => {
                return resolve_pair(git, &RevisionPair { base, target });
            }
            RevisionMode::ExplicitSingle { target } => {
                return resolve_pair(git, &RevisionPair::single(&target));
            }
            RevisionMode::Staged => {
                let diff = git.diff_staged()?;
                if !diff.trim().is_empty() {
                    return resolve_working_area(git, &diff);
                }
                RevisionMode::Unstaged
            }
            RevisionMode::Unstaged => {
                let diff = git.diff_unstaged()?;
                if !diff.trim().is_empty() {
                    return resolve_working_area(git, &diff);
                }
                RevisionMode::FallbackToHead
            }
            RevisionMode::FallbackToHead => RevisionMode::from_expression(CURRENT_CHECKOUT),
        };
    }
}

fn resolve_pair(git: &dyn GitRepo, pair: &RevisionPair) -> Result<RepoInfo, ResolveError> {
    let target = git.resolve_commit(&pair.target).map_err(|err| match err {
        GitError::RevisionNotFound { .. } | GitError::NotEnoughAncestors { .. } => {
            ResolveError::RevisionNotFound { expr: pair.target.clone() }
        }
        other => ResolveError::Git(other),
    })?;

    // `None` means the base lies before the root commit.
    let base = match git.resolve_commit(&pair.base) {
        Ok(id) => Some(id),
        Err(GitError::NotEnoughAncestors { .. }) => None,
        Err(GitError::RevisionNotFound { .. }) => {
            return Err(ResolveError::RevisionNotFound { expr: pair.base.clone() });
        }
        Err(other) => return Err(other.into()),
    };
    let base_tree = match &base {
        Some(id) => id.clone(),
        None => git.object_format()?.empty_tree_id().to_string(),
    };
    debug!(base = %base_tree, %target, "resolved revision pair");

    let diff = git.diff(&base_tree, &target)?;
    let files = filter_test_paths(git.list_tree_files(&target)?);
    let message = git
        .log_messages(base.as_deref(), &target)?
        .iter()
        .map(|message| message.trim())
        .collect::<Vec<_>>()
        .join("\n\n");
    let readme = find_readme(git, &BlobLocation::Commit(target));

    Ok(RepoInfo::new(&diff, &files.join("\n"), &readme, &message))
}

fn resolve_working_area(git: &dyn GitRepo, diff: &str) -> Result<RepoInfo, ResolveError> {
    let files = filter_test_paths(git.list_index_files()?);
    let readme = find_readme(git, &BlobLocation::Index);
    Ok(RepoInfo::new(diff, &files.join("\n"), &readme, ""))
}
