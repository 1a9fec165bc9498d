//! Service context bundling the port trait objects for one run.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::client_for;
use crate::adapters::recording::RecordingLlmClient;
use crate::adapters::replaying::ReplayingLlmClient;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::{ChatSettings, DEFAULT_MAX_TOKENS};
use crate::ports::git::GitRepo;
use crate::ports::llm::{ChatRequest, LlmClient, LlmError, LlmFuture};

/// Bundles the port trait objects a command needs.
///
/// Constructors wire up different chat adapters (live, recording,
/// replaying); the repository is always read live.
pub struct ServiceContext {
    /// Repository being described.
    pub git: Box<dyn GitRepo>,
    /// Chat model client.
    pub llm: Box<dyn LlmClient>,
    /// Model named in requests.
    pub model: String,
    /// Reply length limit sent with requests.
    pub max_tokens: u32,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context that talks to the configured provider.
    #[must_use]
    pub fn live(git: Box<dyn GitRepo>, settings: &ChatSettings) -> Self {
        Self {
            git,
            llm: client_for(settings),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            recorder: None,
        }
    }

    /// Creates a context whose chat traffic is recorded to `path`.
    ///
    /// The cassette is written when this context is dropped.
    #[must_use]
    pub fn recording(git: Box<dyn GitRepo>, settings: &ChatSettings, path: &Path) -> Self {
        let commit = git.resolve_commit("HEAD").unwrap_or_else(|_| "unknown".to_string());
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "vibes-session", commit)));
        Self {
            git,
            llm: Box::new(RecordingLlmClient::new(client_for(settings), Arc::clone(&recorder))),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            recorder: Some(recorder),
        }
    }

    /// Creates a context whose replies come from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(git: Box<dyn GitRepo>, path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        info!(cassette = %cassette.name, interactions = cassette.interactions.len(), "replaying");
        let replayer = CassetteReplayer::new(&cassette);
        Ok(Self::with_client(git, Box::new(ReplayingLlmClient::new(replayer))))
    }

    /// Creates a context that can read the repository but has no chat backend.
    #[must_use]
    pub fn prompt_only(git: Box<dyn GitRepo>) -> Self {
        Self::with_client(git, Box::new(UnconfiguredLlmClient))
    }

    /// Creates a context around an arbitrary client.
    #[must_use]
    pub fn with_client(git: Box<dyn GitRepo>, llm: Box<dyn LlmClient>) -> Self {
        Self {
            git,
            llm,
            model: "replay".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            recorder: None,
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let Ok(recorder) = recorder.lock() else {
            warn!("recorder lock poisoned; cassette not written");
            return;
        };
        match recorder.finish() {
            Ok(path) => info!(path = %path.display(), "cassette written"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}

/// Stands in for the chat port when a run never talks to a model.
struct UnconfiguredLlmClient;

impl LlmClient for UnconfiguredLlmClient {
    fn complete(&self, _request: &ChatRequest) -> LlmFuture<'_> {
        Box::pin(async { Err(LlmError::Unconfigured) })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ports::git::{BlobLocation, GitError, ObjectFormat};

    struct NoRepo;

    impl GitRepo for NoRepo {
        fn resolve_commit(&self, expr: &str) -> Result<String, GitError> {
            Err(GitError::RevisionNotFound { expr: expr.to_string() })
        }
        fn object_format(&self) -> Result<ObjectFormat, GitError> {
            Ok(ObjectFormat::Sha1)
        }
        fn diff(&self, _base: &str, _target: &str) -> Result<String, GitError> {
            Ok(String::new())
        }
        fn diff_staged(&self) -> Result<String, GitError> {
            Ok(String::new())
        }
        fn diff_unstaged(&self) -> Result<String, GitError> {
            Ok(String::new())
        }
        fn list_tree_files(&self, _commit: &str) -> Result<Vec<String>, GitError> {
            Ok(Vec::new())
        }
        fn list_index_files(&self) -> Result<Vec<String>, GitError> {
            Ok(Vec::new())
        }
        fn read_blob(&self, _location: &BlobLocation, path: &str) -> Result<String, GitError> {
            Err(GitError::PathNotFound { path: path.to_string() })
        }
        fn log_messages(
            &self,
            _base: Option<&str>,
            _target: &str,
        ) -> Result<Vec<String>, GitError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn prompt_only_context_refuses_to_chat() {
        let ctx = ServiceContext::prompt_only(Box::new(NoRepo));
        let request = ChatRequest { model: ctx.model.clone(), messages: Vec::new(), max_tokens: 1 };
        assert!(matches!(ctx.llm.complete(&request).await, Err(LlmError::Unconfigured)));
    }

    #[test]
    fn replaying_missing_cassette_is_an_error() {
        let err = ServiceContext::replaying(Box::new(NoRepo), &PathBuf::from("/nonexistent/c.yaml"))
            .err()
            .unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");
        let settings = ChatSettings {
            provider: crate::config::Provider::Anthropic,
            api_key: "k".into(),
            model: "m".into(),
            base_url: Some("http://127.0.0.1:9".into()),
            max_tokens: 5,
        };

        drop(ServiceContext::recording(Box::new(NoRepo), &settings, &path));

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "vibes-session");
        assert_eq!(cassette.commit, "unknown");
        assert!(cassette.interactions.is_empty());
    }
}
