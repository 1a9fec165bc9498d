//! README lookup and file-list filtering.

use tracing::trace;

use crate::ports::git::{BlobLocation, GitRepo};

/// README spellings, in priority order.
pub const README_CANDIDATES: [&str; 4] = ["README.md", "README.MD", "Readme.md", "readme.md"];

/// Tries each key in order and returns the first successful lookup.
pub fn first_success<K, T, E>(
    keys: impl IntoIterator<Item = K>,
    mut lookup: impl FnMut(K) -> Result<T, E>,
) -> Option<T> {
    keys.into_iter().find_map(|key| lookup(key).ok())
}

/// Reads the first README that exists at `location`, or an empty string.
pub fn find_readme(git: &dyn GitRepo, location: &BlobLocation) -> String {
    first_success(README_CANDIDATES, |name| {
        git.read_blob(location, name)
            .inspect_err(|err| trace!(name, %err, "README candidate missed"))
    })
    .unwrap_or_default()
}

/// Returns `true` for paths under a top-level `tests` directory.
///
/// A leading `"tests` also counts: some listings quote paths that contain
/// special characters.
#[must_use]
pub fn is_test_path(path: &str) -> bool {
    path.split('/').next() == Some("tests") || path.starts_with("\"tests")
}

/// Drops test paths, keeping the order of the rest.
#[must_use]
pub fn filter_test_paths(paths: Vec<String>) -> Vec<String> {
    paths.into_iter().filter(|path| !is_test_path(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_returns_first_ok() {
        let found = first_success(["a", "b", "c"], |key| match key {
            "b" | "c" => Ok(key.to_uppercase()),
            _ => Err("missing"),
        });
        assert_eq!(found.as_deref(), Some("B"));
    }

    #[test]
    fn first_success_stops_after_hit() {
        let mut tried = Vec::new();
        let _ = first_success([1, 2, 3], |key| {
            tried.push(key);
            if key == 2 {
                Ok(key)
            } else {
                Err(())
            }
        });
        assert_eq!(tried, vec![1, 2]);
    }

    #[test]
    fn first_success_none_when_all_fail() {
        let found: Option<u8> = first_success(["x"], |_| Err::<u8, _>("nope"));
        assert!(found.is_none());
    }

    #[test]
    fn filters_only_top_level_tests_segment() {
        let files = vec![
            "README.md".to_string(),
            "tests/foo.py".to_string(),
            "lib/tests_helper.py".to_string(),
        ];
        assert_eq!(filter_test_paths(files), vec!["README.md", "lib/tests_helper.py"]);
    }

    #[test]
    fn test_path_rules() {
        assert!(is_test_path("tests"));
        assert!(is_test_path("tests/a/b.rs"));
        assert!(is_test_path("\"tests/sp ace.rs\""));
        assert!(!is_test_path("src/tests/mod.rs"));
        assert!(!is_test_path("tests_helper.py"));
        assert!(!is_test_path("Tests/a.rs"));
    }
}
