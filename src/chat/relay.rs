//! Terminal relay between the user and a [`ChatSession`].

use std::io::{BufRead, Write};

use super::{ChatError, ChatSession};

/// Shown before each line of user input.
pub const USER_PROMPT: &str = "You: ";

/// What a line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Send this text to the model.
    Message(String),
    /// End the conversation.
    Stop,
}

/// Interprets one line typed by the user.
///
/// An empty line, `exit` or `quit` (any case) ends the conversation.
#[must_use]
pub fn parse_user_input(line: &str) -> UserInput {
    let text = line.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
        UserInput::Stop
    } else {
        UserInput::Message(text.to_string())
    }
}

/// Prints replies to `writer` and reads follow-up messages from `reader`.
pub struct RelayLoop<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    skip_chat: bool,
}

impl<R: BufRead, W: Write> RelayLoop<R, W> {
    /// Creates a relay; with `skip_chat` only the first reply is printed.
    pub fn new(reader: R, writer: W, skip_chat: bool) -> Self {
        Self { reader, writer, skip_chat }
    }

    /// Sends `prompt`, prints the reply, and keeps relaying until the user
    /// stops or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if a reply cannot be obtained or the terminal fails.
    pub async fn run(
        mut self,
        session: &mut ChatSession<'_>,
        prompt: &str,
    ) -> Result<(), ChatError> {
        let mut next = prompt.to_string();
        loop {
            let reply = session.reply(&next).await?;
            writeln!(self.writer, "\n{reply}\n")?;
            self.writer.flush()?;

            if self.skip_chat {
                return Ok(());
            }
            match self.read_user_input()? {
                UserInput::Message(text) => next = text,
                UserInput::Stop => return Ok(()),
            }
        }
    }

    fn read_user_input(&mut self) -> Result<UserInput, ChatError> {
        write!(self.writer, "{USER_PROMPT}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Ok(UserInput::Stop);
        }
        Ok(parse_user_input(&line))
    }
}
