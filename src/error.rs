//! Top-level error type for a `vibes` run.

use std::path::PathBuf;

use thiserror::Error;

use crate::chat::ChatError;
use crate::config::ConfigError;
use crate::ports::git::GitError;
use crate::repo_info::ResolveError;

/// Anything that ends a run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum VibesError {
    /// The repository argument is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    /// The repository could not be opened or read.
    #[error(transparent)]
    Git(#[from] GitError),
    /// The revision expression could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Provider settings are missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The conversation failed.
    #[error(transparent)]
    Chat(#[from] ChatError),
    /// A cassette could not be loaded.
    #[error("{0}")]
    Cassette(String),
    /// Runtime setup failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
