//! The `vibes` command: build the prompt, then relay the conversation.

use std::io::{BufRead, Write};

use tracing::info;

use crate::chat::{ChatError, ChatSession, RelayLoop};
use crate::context::ServiceContext;
use crate::prompt::{assemble, PromptTemplate};
use crate::repo_info::{resolve, ResolveError};

/// Resolves `commit` against the repository and fills `template`.
///
/// # Errors
///
/// Returns an error if the revision expression cannot be resolved.
pub fn build_prompt(
    ctx: &ServiceContext,
    commit: &str,
    description: &str,
    template: &PromptTemplate,
) -> Result<String, ResolveError> {
    let info = resolve(ctx.git.as_ref(), commit)?;
    info!(
        diff_bytes = info.diff.len(),
        files = info.file_list.lines().count(),
        has_readme = !info.readme_content.is_empty(),
        "collected repository state"
    );
    Ok(assemble(template, &info, description))
}

/// Sends `prompt` to the context's model and relays the conversation over
/// `reader`/`writer`.
///
/// # Errors
///
/// Returns an error if the model fails or the terminal cannot be used.
pub async fn converse<R: BufRead, W: Write>(
    ctx: &ServiceContext,
    prompt: &str,
    skip_chat: bool,
    reader: R,
    writer: W,
) -> Result<(), ChatError> {
    let mut session = ChatSession::new(ctx.llm.as_ref(), ctx.model.clone(), ctx.max_tokens);
    RelayLoop::new(reader, writer, skip_chat).run(&mut session, prompt).await
}
