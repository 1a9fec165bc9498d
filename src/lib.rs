//! Core library for the `vibes` CLI: collects repository state for a
//! revision, fills the commit-message prompt, and relays it to a chat model.

pub mod adapters;
pub mod cassette;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod ports;
pub mod prompt;
pub mod repo_info;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` are printed here and count as success.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };

    logging::init();
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
    }

    commands::dispatch(&cli).map_err(|err| err.to_string())
}
