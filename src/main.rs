//! Binary entrypoint for the `vibes` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match vibes::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
