//! Diagnostic logging to stderr.
//!
//! Stdout carries the prompt and the model's replies, so diagnostics never
//! go there. The level comes from `VIBES_LOG` and defaults to `warn`.

use tracing::Level;

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "VIBES_LOG";

/// Installs the global subscriber. Later calls are no-ops.
pub fn init() {
    let level = std::env::var(LOG_ENV).ok().map_or(Level::WARN, |value| parse_level(&value));
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Maps a level name to a [`Level`]; unknown names fall back to `warn`.
#[must_use]
pub fn parse_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}
