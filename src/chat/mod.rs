//! Conversation with a chat model: the first message is the assembled
//! prompt, later messages come from the user.

pub mod relay;
pub mod session;

pub use relay::{parse_user_input, RelayLoop, UserInput, USER_PROMPT};
pub use session::ChatSession;

use thiserror::Error;

use crate::ports::llm::LlmError;

/// Errors that end a conversation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The model could not produce a reply.
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// Reading user input or writing a reply failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
