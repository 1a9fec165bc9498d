//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for `vibes`.
#[derive(Debug, Parser)]
#[command(name = "vibes", version, about = "Suggest commit messages from repository changes")]
pub struct Cli {
    /// Repository to describe.
    #[arg(default_value = ".")]
    pub repo: PathBuf,

    /// Revision or `base..target` range to describe; empty means staged,
    /// then unstaged changes, then the last commit.
    #[arg(short, long, default_value = "")]
    pub commit: String,

    /// Extra notes about the change, passed to the model.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Print the prompt and exit without contacting a model.
    #[arg(long)]
    pub only_prompt: bool,

    /// Print the first suggestion and exit instead of chatting.
    #[arg(short, long)]
    pub skip_chat: bool,

    /// Chat provider (openai, anthropic or google).
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name for the chat provider.
    #[arg(long)]
    pub model: Option<String>,
}
