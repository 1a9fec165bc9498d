//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (the git repository, the chat model).
//! Implementations live in `src/adapters/`.

pub mod git;
pub mod llm;

pub use git::{is_empty_tree, BlobLocation, GitError, GitRepo, ObjectFormat};
pub use llm::{
    ChatMessage, ChatRequest, CompletionResponse, LlmClient, LlmError, LlmFuture, Role,
};
