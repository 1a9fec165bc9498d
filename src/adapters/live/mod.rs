//! Live adapters for real external interactions.

pub mod git;
pub mod llm;

pub use git::LiveGitRepo;
pub use llm::client_for;
