//! Recording adapters that capture interactions to cassettes.

pub mod llm;

pub use llm::RecordingLlmClient;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the ok/err JSON convention.
///
/// Mirror of `replaying::replay_result`:
/// - `Ok(v)` is serialized as `{"ok": v}`
/// - `Err(e)` is serialized as `{"err": e.to_string()}`
///
/// A value that cannot be serialized is logged and left out of the cassette.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::to_value(v).map(|inner| serde_json::json!({ "ok": inner })),
        Err(e) => Ok(serde_json::json!({ "err": e.to_string() })),
    };
    let (input_json, output_json) = match (serde_json::to_value(input), output) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            warn!(port, method, error = %e, "interaction not recorded");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(_) => warn!(port, method, "recorder lock poisoned; interaction not recorded"),
    }
}
