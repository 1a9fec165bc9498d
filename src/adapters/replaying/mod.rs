//! Replaying adapters that serve recorded interactions.

pub mod llm;

pub use llm::ReplayingLlmClient;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Fetch the output of the next `port`/`method` interaction.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().map_err(|_| "replayer lock poisoned".to_string())?;
    guard.next_interaction(port, method).map(|interaction| interaction.output.clone())
}

/// Decode an output written by `recording::record_result`.
///
/// The outer error means the cassette itself is unusable; the inner result
/// is the recorded outcome, with a recorded failure as its message.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<Result<T, String>, String> {
    if let Some(err) = output.get("err") {
        return Ok(Err(err.as_str().map_or_else(|| err.to_string(), str::to_string)));
    }
    let ok = output.get("ok").ok_or_else(|| format!("expected ok/err object, got {output}"))?;
    serde_json::from_value(ok.clone()).map(Ok).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn replay_result_decodes_ok_and_err() {
        let ok: Result<Result<u32, String>, String> = replay_result(json!({"ok": 7}));
        assert_eq!(ok, Ok(Ok(7)));

        let err: Result<Result<u32, String>, String> = replay_result(json!({"err": "boom"}));
        assert_eq!(err, Ok(Err("boom".into())));
    }

    #[test]
    fn replay_result_rejects_other_shapes() {
        let bad: Result<Result<u32, String>, String> = replay_result(json!({"Ok": 7}));
        assert!(bad.unwrap_err().contains("expected ok/err"));

        let wrong_type: Result<Result<u32, String>, String> = replay_result(json!({"ok": "x"}));
        assert!(wrong_type.is_err());
    }
}
