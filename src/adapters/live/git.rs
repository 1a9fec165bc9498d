//! Live git adapter backed by `libgit2`.

use std::path::Path;

use git2::{
    Commit, Diff, DiffFindOptions, DiffFormat, DiffOptions, Index, ObjectType, Oid, Repository,
    Sort, Tree, TreeWalkMode, TreeWalkResult,
};
use tracing::trace;

use crate::ports::git::{is_empty_tree, BlobLocation, GitError, GitRepo, ObjectFormat};

/// Live git adapter that reads a repository through `git2`.
///
/// The adapter never writes to the repository.
pub struct LiveGitRepo {
    repo: Repository,
}

impl LiveGitRepo {
    /// Opens the repository rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::OpenRepository`] if `path` is not a git repository.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::open(path).map_err(|e| GitError::OpenRepository {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        Ok(Self { repo })
    }

    fn find_commit(&self, id: &str) -> Result<Commit<'_>, GitError> {
        let oid = parse_oid(id)?;
        self.repo.find_commit(oid).map_err(backend)
    }

    /// Loads the tree behind a tree-ish id; the empty tree maps to `None`
    /// because it is usually not stored in the object database.
    fn tree_for(&self, id: &str) -> Result<Option<Tree<'_>>, GitError> {
        if is_empty_tree(id) {
            return Ok(None);
        }
        let oid = parse_oid(id)?;
        let tree = self
            .repo
            .find_object(oid, None)
            .and_then(|o| o.peel_to_tree())
            .map_err(backend)?;
        Ok(Some(tree))
    }

    fn index(&self) -> Result<Index, GitError> {
        let mut index = self.repo.index().map_err(backend)?;
        index.read(false).map_err(backend)?;
        Ok(index)
    }

    /// Diff options with `diff.mnemonicPrefix` applied for working-area diffs.
    fn working_area_options(&self, old_prefix: &str, new_prefix: &str) -> DiffOptions {
        let mnemonic = self
            .repo
            .config()
            .and_then(|config| config.get_bool("diff.mnemonicPrefix"))
            .unwrap_or(false);
        let mut opts = DiffOptions::new();
        if mnemonic {
            opts.old_prefix(old_prefix).new_prefix(new_prefix);
        }
        opts
    }

    /// Resolves an expression that `revparse` rejected by walking its
    /// ancestry suffix step by step, so a walk past the root is reported as
    /// [`GitError::NotEnoughAncestors`] instead of a generic failure.
    fn walk_ancestry(&self, expr: &str) -> Result<String, GitError> {
        let not_found = || GitError::RevisionNotFound { expr: expr.to_string() };
        let (stem, steps) = split_ancestry(expr);
        if steps.is_empty() {
            return Err(not_found());
        }
        let mut commit = self
            .repo
            .revparse_single(stem)
            .and_then(|o| o.peel_to_commit())
            .map_err(|_| not_found())?;

        for step in steps {
            match step {
                AncestryStep::FirstParent(count) => {
                    for _ in 0..count {
                        if commit.parent_count() == 0 {
                            return Err(GitError::NotEnoughAncestors { expr: expr.to_string() });
                        }
                        commit = commit.parent(0).map_err(backend)?;
                    }
                }
                AncestryStep::Parent(0) => {}
                AncestryStep::Parent(nth) => {
                    if commit.parent_count() == 0 {
                        return Err(GitError::NotEnoughAncestors { expr: expr.to_string() });
                    }
                    commit = commit.parent(nth - 1).map_err(|_| not_found())?;
                }
            }
        }
        Ok(commit.id().to_string())
    }
}

impl GitRepo for LiveGitRepo {
    fn resolve_commit(&self, expr: &str) -> Result<String, GitError> {
        match self.repo.revparse_single(expr).and_then(|o| o.peel_to_commit()) {
            Ok(commit) => Ok(commit.id().to_string()),
            Err(err) => {
                trace!(expr, error = %err.message(), "revparse failed, walking ancestry");
                self.walk_ancestry(expr)
            }
        }
    }

    fn object_format(&self) -> Result<ObjectFormat, GitError> {
        let config = self.repo.config().map_err(backend)?;
        match config.get_string("extensions.objectformat") {
            Ok(format) if format.eq_ignore_ascii_case("sha256") => Ok(ObjectFormat::Sha256),
            _ => Ok(ObjectFormat::Sha1),
        }
    }

    fn diff(&self, base: &str, target: &str) -> Result<String, GitError> {
        let old_tree = self.tree_for(base)?;
        let new_tree = self.tree_for(target)?;
        // libgit2 would otherwise honour diff.mnemonicPrefix here too.
        let mut opts = DiffOptions::new();
        opts.old_prefix("a/").new_prefix("b/");
        let mut diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), new_tree.as_ref(), Some(&mut opts))
            .map_err(backend)?;
        detect_renames(&mut diff)?;
        patch_text(&diff)
    }

    fn diff_staged(&self) -> Result<String, GitError> {
        // An unborn HEAD compares the index against the empty tree.
        let head_tree = self.repo.head().ok().and_then(|head| head.peel_to_tree().ok());
        let index = self.index()?;
        let mut opts = self.working_area_options("c/", "i/");
        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))
            .map_err(backend)?;
        detect_renames(&mut diff)?;
        patch_text(&diff)
    }

    fn diff_unstaged(&self) -> Result<String, GitError> {
        let index = self.index()?;
        let mut opts = self.working_area_options("i/", "w/");
        let mut diff = self
            .repo
            .diff_index_to_workdir(Some(&index), Some(&mut opts))
            .map_err(backend)?;
        detect_renames(&mut diff)?;
        patch_text(&diff)
    }

    fn list_tree_files(&self, commit: &str) -> Result<Vec<String>, GitError> {
        let tree = self.find_commit(commit)?.tree().map_err(backend)?;
        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push(format!("{root}{name}"));
                }
            }
            TreeWalkResult::Ok
        })
        .map_err(backend)?;
        Ok(files)
    }

    fn list_index_files(&self) -> Result<Vec<String>, GitError> {
        let index = self.index()?;
        let mut files: Vec<String> =
            index.iter().map(|entry| String::from_utf8_lossy(&entry.path).into_owned()).collect();
        // Conflicted paths appear once per stage.
        files.dedup();
        Ok(files)
    }

    fn read_blob(&self, location: &BlobLocation, path: &str) -> Result<String, GitError> {
        let not_found = || GitError::PathNotFound { path: path.to_string() };
        let blob_id = match location {
            BlobLocation::Commit(id) => {
                let tree = self.find_commit(id)?.tree().map_err(backend)?;
                let entry = tree.get_path(Path::new(path)).map_err(|_| not_found())?;
                if entry.kind() != Some(ObjectType::Blob) {
                    return Err(not_found());
                }
                entry.id()
            }
            BlobLocation::Index => {
                self.index()?.get_path(Path::new(path), 0).ok_or_else(not_found)?.id
            }
        };
        let blob = self.repo.find_blob(blob_id).map_err(backend)?;
        Ok(String::from_utf8_lossy(blob.content()).into_owned())
    }

    fn log_messages(&self, base: Option<&str>, target: &str) -> Result<Vec<String>, GitError> {
        let mut walk = self.repo.revwalk().map_err(backend)?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME).map_err(backend)?;
        walk.push(parse_oid(target)?).map_err(backend)?;
        if let Some(base) = base {
            walk.hide(parse_oid(base)?).map_err(backend)?;
        }

        let mut messages = Vec::new();
        for oid in walk {
            let commit = self.repo.find_commit(oid.map_err(backend)?).map_err(backend)?;
            messages.push(String::from_utf8_lossy(commit.message_bytes()).into_owned());
        }
        Ok(messages)
    }
}

/// One `~N` or `^N` step at the end of a revision expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AncestryStep {
    /// `~N`: follow the first parent `N` times.
    FirstParent(usize),
    /// `^N`: select the `N`th parent (`^0` is the commit itself).
    Parent(usize),
}

/// Splits trailing `~N` / `^N` steps off an expression.
///
/// `"HEAD~2^"` becomes `("HEAD", [FirstParent(2), Parent(1)])`.
fn split_ancestry(expr: &str) -> (&str, Vec<AncestryStep>) {
    let bytes = expr.as_bytes();
    let mut end = bytes.len();
    let mut steps = Vec::new();

    loop {
        let mut digits_start = end;
        while digits_start > 0 && bytes[digits_start - 1].is_ascii_digit() {
            digits_start -= 1;
        }
        if digits_start == 0 {
            break;
        }
        let marker = bytes[digits_start - 1];
        if marker != b'~' && marker != b'^' {
            break;
        }
        let count = if digits_start == end {
            1
        } else {
            expr[digits_start..end].parse().unwrap_or(usize::MAX)
        };
        steps.push(if marker == b'~' {
            AncestryStep::FirstParent(count)
        } else {
            AncestryStep::Parent(count)
        });
        end = digits_start - 1;
    }

    steps.reverse();
    (&expr[..end], steps)
}

fn parse_oid(id: &str) -> Result<Oid, GitError> {
    Oid::from_str(id).map_err(|_| GitError::RevisionNotFound { expr: id.to_string() })
}

fn backend(err: git2::Error) -> GitError {
    GitError::Backend(err.message().to_string())
}

/// Pairs deleted and added paths into renames, as `git diff` does by default.
fn detect_renames(diff: &mut Diff<'_>) -> Result<(), GitError> {
    let mut opts = DiffFindOptions::new();
    opts.renames(true);
    diff.find_similar(Some(&mut opts)).map_err(backend)
}

/// Renders a diff as `git diff`-style patch text.
fn patch_text(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut out = Vec::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if matches!(origin, '+' | '-' | ' ') {
            let mut buf = [0; 4];
            out.extend_from_slice(origin.encode_utf8(&mut buf).as_bytes());
        }
        out.extend_from_slice(line.content());
        true
    })
    .map_err(backend)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
