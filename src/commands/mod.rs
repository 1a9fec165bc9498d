//! Command dispatch.

pub mod suggest;

use std::env;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::adapters::live::LiveGitRepo;
use crate::cassette::{RECORD_ENV, REPLAY_ENV};
use crate::cli::Cli;
use crate::config::{Config, Overrides};
use crate::context::ServiceContext;
use crate::error::VibesError;
use crate::prompt::PromptTemplate;

/// Run `vibes` for parsed arguments.
///
/// When `VIBES_REPLAY` names a cassette, replies come from it instead of a
/// provider. When `VIBES_RECORD` names a file, the conversation is recorded
/// there.
///
/// # Errors
///
/// Returns an error if the repository, configuration, or conversation fails.
pub fn dispatch(cli: &Cli) -> Result<(), VibesError> {
    if !cli.repo.is_dir() {
        return Err(VibesError::NotADirectory(cli.repo.clone()));
    }

    let ctx = build_context(cli)?;
    let template = PromptTemplate::embedded();
    let prompt = suggest::build_prompt(&ctx, &cli.commit, &cli.description, &template)?;

    if cli.only_prompt {
        println!("{prompt}");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    runtime.block_on(suggest::converse(
        &ctx,
        &prompt,
        cli.skip_chat,
        stdin.lock(),
        stdout.lock(),
    ))?;
    Ok(())
}

fn build_context(cli: &Cli) -> Result<ServiceContext, VibesError> {
    let git = Box::new(LiveGitRepo::open(&cli.repo)?);

    if cli.only_prompt {
        return Ok(ServiceContext::prompt_only(git));
    }
    if let Some(path) = env_path(REPLAY_ENV) {
        debug!(path = %path.display(), "replaying chat from cassette");
        return ServiceContext::replaying(git, &path).map_err(VibesError::Cassette);
    }

    let config = Config::load()?;
    let overrides = Overrides { provider: cli.provider.as_deref(), model: cli.model.as_deref() };
    let settings = config.chat_settings(overrides)?;

    Ok(match env_path(RECORD_ENV) {
        Some(path) => ServiceContext::recording(git, &settings, &path),
        None => ServiceContext::live(git, &settings),
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|value| !value.is_empty()).map(PathBuf::from)
}
