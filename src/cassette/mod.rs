//! Cassette format for recording and replaying chat sessions.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;

/// Environment variable naming a cassette to record the session into.
pub const RECORD_ENV: &str = "VIBES_RECORD";
/// Environment variable naming a cassette to replay instead of calling a provider.
pub const REPLAY_ENV: &str = "VIBES_REPLAY";
